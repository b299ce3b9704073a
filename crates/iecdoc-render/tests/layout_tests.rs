//! Integration tests for iecdoc-render

use std::io::Write;

use iecdoc_data::RecordGrouper;
use iecdoc_render::{render_pages, AssetPaths, PageKind, TranscriptTemplate, PAGE_HEIGHT, PAGE_WIDTH};
use tempfile::NamedTempFile;

const ROSTER: &str = "\
NAME,NUMBER,TERM,PROGRAM,LEVEL,STATUS,COURSE,COURSE NAME,COURSE GRADE,COLUMN1
Maria Lopez,1001,Fall 2025,Intensive English,3,Active,ESL301,Reading,B,93%
Kenji Sato,1002,Fall 2025,Intensive English,2,Active,ESL201,Listening,C,80
Maria Lopez,1001,Fall 2025,Intensive English,3,Active,ESL302,Grammar,A,88%
Ana Souza,1003,Fall 2025,Academic English,4,Active,ESL401,Oral Communication,A,100%
";

fn write_asset(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_page_order_follows_first_appearance() {
    let ds = RecordGrouper::default().parse(ROSTER).unwrap();
    let pages = render_pages(&ds, TranscriptTemplate::default());

    let students: Vec<&str> = pages.iter().map(|p| p.student()).collect();
    assert_eq!(
        students,
        vec!["Maria Lopez", "Maria Lopez", "Kenji Sato", "Kenji Sato", "Ana Souza", "Ana Souza"]
    );
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.index(), i);
        let expected = if i % 2 == 0 { PageKind::Transcript } else { PageKind::Levels };
        assert_eq!(page.kind(), expected);
        assert_eq!((page.width(), page.height()), (PAGE_WIDTH, PAGE_HEIGHT));
    }
}

#[test]
fn test_pages_are_standalone_svg() {
    let ds = RecordGrouper::default().parse(ROSTER).unwrap();
    for page in render_pages(&ds, TranscriptTemplate::default()) {
        let markup = page.markup();
        assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(markup.trim_end().ends_with("</svg>"));
        assert!(markup.contains("viewBox=\"0 0 816 1056\""));
    }
}

#[test]
fn test_transcript_uses_only_own_courses() {
    let ds = RecordGrouper::default().parse(ROSTER).unwrap();
    let pages = render_pages(&ds, TranscriptTemplate::default());

    let maria = pages[0].markup();
    assert!(maria.contains("Grammar"));
    assert!(maria.contains(">91%<"));
    assert!(!maria.contains("Listening"));

    let kenji = pages[2].markup();
    assert!(kenji.contains("Listening"));
    assert!(kenji.contains(">80%<"));
}

#[test]
fn test_configured_assets_are_embedded() {
    let logo = write_asset(".svg", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
    let level = write_asset(".png", b"\x89PNG\r\n\x1a\nnot really a png");

    let template = TranscriptTemplate {
        assets: AssetPaths {
            logo: Some(logo.path().to_path_buf()),
            level_images: vec![level.path().to_path_buf()],
            ..Default::default()
        },
        ..Default::default()
    };
    let ds = RecordGrouper::default().parse(ROSTER).unwrap();
    let pages = render_pages(&ds, template);

    assert!(pages[0].markup().contains("href=\"data:image/svg+xml;base64,"));
    // Logo replaces the header band; the footer band still names the institution
    assert_eq!(pages[0].markup().matches(">Intensive English Center<").count(), 1);

    let levels = pages[1].markup();
    assert!(levels.contains("href=\"data:image/png;base64,"));
    assert!(!levels.contains("Academic Bridge"));
}

#[test]
fn test_missing_assets_fall_back() {
    let template = TranscriptTemplate {
        assets: AssetPaths {
            logo: Some("/nonexistent/logo.png".into()),
            footer: Some("/nonexistent/footer.png".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let ds = RecordGrouper::default().parse(ROSTER).unwrap();
    let pages = render_pages(&ds, template);

    assert!(!pages[0].markup().contains("<image"));
    assert_eq!(pages[0].markup().matches(">Intensive English Center<").count(), 2);
}
