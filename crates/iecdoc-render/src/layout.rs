//! Transcript layout: one grouped dataset → ordered page surfaces.
//!
//! Every student gets two pages, in dataset order:
//!
//! ```text
//! ┌──────────────────────────┐ ┌──────────────────────────┐
//! │ header / logo            │ │ header / logo            │
//! │ OFFICIAL TRANSCRIPT      │ │ PROGRAM LEVELS           │
//! │ student information      │ │ level table or images    │
//! │ academic records  │ att. │ │                          │
//! │ remarks                  │ │                          │
//! │ grading scale            │ │                          │
//! │ signature │ date issued  │ │                          │
//! │ partner logos / footer   │ │ partner logos / footer   │
//! └──────────────────────────┘ └──────────────────────────┘
//! ```
//!
//! A transcript whose course list does not fit above the partner logos and
//! footer grows taller than [`PAGE_HEIGHT`]; the bottom bands move down with it.

use iecdoc_data::{Field, GroupedDataset, StudentGroup};

use crate::assets::LoadedAssets;
use crate::surface::{PageKind, PageSurface, PAGE_HEIGHT, PAGE_WIDTH};
use crate::svg::{truncate, wrap_text, SvgWriter, TextStyle};
use crate::template::TranscriptTemplate;

/// Pages emitted per student
pub const PAGES_PER_STUDENT: usize = 2;

const MARGIN: f32 = 48.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const PRIMARY: &str = "#075985";
const PRIMARY_DARK: &str = "#0c4a6e";
const TINT: &str = "#e0f2fe";
const BORDER: &str = "#94a3b8";
const WHITE: &str = "#ffffff";

/// Space reserved for course rows before they start shrinking
const COURSE_AREA: f32 = 200.0;

/// Gap kept between page content and the bottom bands
const BAND_GAP: f32 = 12.0;
const PARTNER_BAND: f32 = 140.0;
const FOOTER_IMAGE_HEIGHT: f32 = 80.0;
const FOOTER_BAR_HEIGHT: f32 = 28.0;

/// Academic records columns: (width, header line 1, header line 2)
const COURSE_COLUMNS: [(f32, &str, &str); 10] = [
    (170.0, "COURSE", ""),
    (60.0, "CODE", ""),
    (55.0, "MID-TERM", ""),
    (55.0, "FOLLOW UP", ""),
    (70.0, "PROJECT /", "PORTFOLIO"),
    (50.0, "FINAL", ""),
    (60.0, "COURSE", "SCORE"),
    (55.0, "GRADE", "SCORE"),
    (60.0, "RESULT", ""),
    (85.0, "ATTENDANCE", ""),
];

/// Fields shown in the first nine course columns
const COURSE_FIELDS: [Field; 9] = [
    Field::CourseName,
    Field::Course,
    Field::MidTerm,
    Field::FollowUp,
    Field::CourseProject,
    Field::FinalExam,
    Field::CourseScore,
    Field::CourseGrade,
    Field::Result,
];

/// Lays out transcript pages from a template
pub struct TranscriptLayout {
    template: TranscriptTemplate,
    assets: LoadedAssets,
}

impl Default for TranscriptLayout {
    fn default() -> Self {
        Self::new(TranscriptTemplate::default())
    }
}

impl TranscriptLayout {
    /// Create a layout, loading the template's image assets
    pub fn new(template: TranscriptTemplate) -> Self {
        let assets = LoadedAssets::load(&template.assets);
        Self { template, assets }
    }

    /// Create a layout with already-loaded assets
    pub fn with_assets(template: TranscriptTemplate, assets: LoadedAssets) -> Self {
        Self { template, assets }
    }

    pub fn template(&self) -> &TranscriptTemplate {
        &self.template
    }

    /// Page surfaces for every student, in dataset order
    ///
    /// Each student contributes a transcript page followed by a levels
    /// page; indices run contiguously over the whole batch.
    pub fn pages(&self, dataset: &GroupedDataset) -> Vec<PageSurface> {
        let mut pages = Vec::with_capacity(dataset.len() * PAGES_PER_STUDENT);
        for group in dataset {
            let index = pages.len();
            pages.push(self.transcript_page(group, index));
            pages.push(self.levels_page(group, index + 1));
        }
        log::debug!(
            "Laid out {} pages for {} students",
            pages.len(),
            dataset.len()
        );
        pages
    }

    /// First page: student details, course results and grading scale
    pub fn transcript_page(&self, group: &StudentGroup, index: usize) -> PageSurface {
        let mut svg = SvgWriter::new(PAGE_WIDTH, PAGE_HEIGHT);

        let mut y = self.header(&mut svg);
        svg.text(
            PAGE_WIDTH / 2.0,
            y + 24.0,
            TextStyle::new(18.0).bold().fill(PRIMARY).centered(),
            &self.template.title,
        );
        y += 40.0;

        y = section_bar(&mut svg, y, "STUDENT INFORMATION");
        y = student_info(&mut svg, y, group);
        y = section_bar(&mut svg, y + 8.0, "ACADEMIC RECORDS");
        y = course_table(&mut svg, y, group);
        y = self.remarks(&mut svg, y + 10.0);
        y = self.grading_scale(&mut svg, y + 6.0);
        y = self.signature(&mut svg, y + 10.0);

        let height = y + self.bottom_reserve();
        if height > PAGE_HEIGHT {
            log::debug!(
                "{} courses for '{}' extend the transcript to {:.1} px",
                group.len(),
                group.key(),
                height
            );
            svg.grow_to(height);
        }
        let height = svg.height();

        self.partner_logos(&mut svg, height);
        self.footer(&mut svg, height);

        PageSurface::new(
            index,
            group.key(),
            PageKind::Transcript,
            PAGE_WIDTH,
            height,
            svg.finish(),
        )
    }

    /// Second page: program level descriptions
    pub fn levels_page(&self, group: &StudentGroup, index: usize) -> PageSurface {
        let mut svg = SvgWriter::new(PAGE_WIDTH, PAGE_HEIGHT);

        let mut y = self.header(&mut svg);
        svg.text(
            PAGE_WIDTH / 2.0,
            y + 24.0,
            TextStyle::new(18.0).bold().fill(PRIMARY).centered(),
            "PROGRAM LEVELS",
        );
        y += 40.0;

        if self.assets.level_images.is_empty() {
            self.levels_table(&mut svg, y);
        } else {
            let bottom = PAGE_HEIGHT - 160.0;
            let slot = (bottom - y) / self.assets.level_images.len() as f32;
            for (i, href) in self.assets.level_images.iter().enumerate() {
                svg.image(MARGIN, y + slot * i as f32, CONTENT_WIDTH, slot - 8.0, href);
            }
        }

        self.partner_logos(&mut svg, PAGE_HEIGHT);
        self.footer(&mut svg, PAGE_HEIGHT);

        PageSurface::new(
            index,
            group.key(),
            PageKind::Levels,
            PAGE_WIDTH,
            PAGE_HEIGHT,
            svg.finish(),
        )
    }

    fn header(&self, svg: &mut SvgWriter) -> f32 {
        match &self.assets.logo {
            Some(href) => svg.image(MARGIN, 20.0, CONTENT_WIDTH, 80.0, href),
            None => {
                svg.rect(0.0, 0.0, PAGE_WIDTH, 96.0, PRIMARY_DARK, None);
                svg.text(
                    PAGE_WIDTH / 2.0,
                    56.0,
                    TextStyle::new(22.0).bold().fill(WHITE).centered(),
                    &self.template.institution,
                );
            }
        }
        110.0
    }

    fn remarks(&self, svg: &mut SvgWriter, y: f32) -> f32 {
        let y = section_bar(svg, y, "REMARKS");
        let lines = wrap_text(&self.template.remarks, 150);
        svg.paragraph(MARGIN + 4.0, y + 12.0, 11.0, TextStyle::new(8.0), &lines)
    }

    fn grading_scale(&self, svg: &mut SvgWriter, y: f32) -> f32 {
        let bands = &self.template.grading_scale;
        let mut y = section_bar(svg, y, "GRADING SCALE");
        if bands.is_empty() {
            return y;
        }

        let cell = CONTENT_WIDTH / bands.len() as f32;
        let wrap_at = ((cell - 6.0) / 3.6).max(8.0) as usize;

        for (i, band) in bands.iter().enumerate() {
            let x = MARGIN + cell * i as f32;
            svg.rect(x, y, cell, 16.0, TINT, Some(BORDER));
            svg.text_in_box(x, y, cell, 16.0, TextStyle::new(10.0).bold().centered(), &band.grade);
            svg.rect(x, y + 16.0, cell, 16.0, WHITE, Some(BORDER));
            svg.text_in_box(x, y + 16.0, cell, 16.0, TextStyle::new(8.0).centered(), &band.range);
        }
        y += 32.0;

        let described: Vec<Vec<String>> = bands
            .iter()
            .map(|b| wrap_text(&b.description, wrap_at))
            .collect();
        let max_lines = described.iter().map(Vec::len).max().unwrap_or(0) + 1;
        let height = max_lines as f32 * 9.0 + 8.0;

        for (i, (band, lines)) in bands.iter().zip(&described).enumerate() {
            let x = MARGIN + cell * i as f32;
            svg.rect(x, y, cell, height, WHITE, Some(BORDER));
            svg.text(x + 3.0, y + 10.0, TextStyle::new(7.0).bold(), &band.headline);
            svg.paragraph(x + 3.0, y + 19.0, 9.0, TextStyle::new(7.0), lines);
        }

        y + height
    }

    fn signature(&self, svg: &mut SvgWriter, y: f32) -> f32 {
        let half = CONTENT_WIDTH / 2.0;
        let head = TextStyle::new(9.0).bold().fill(PRIMARY).centered();

        svg.rect(MARGIN, y, half, 18.0, TINT, Some(BORDER));
        svg.text_in_box(MARGIN, y, half, 18.0, head, "OFFICIAL SIGNATURE");
        svg.rect(MARGIN + half, y, half, 18.0, TINT, Some(BORDER));
        svg.text_in_box(MARGIN + half, y, half, 18.0, head, "DATE ISSUED");

        let body = y + 18.0;
        svg.rect(MARGIN, body, half, 44.0, WHITE, Some(BORDER));
        svg.rect(MARGIN + half, body, half, 44.0, WHITE, Some(BORDER));
        svg.text(
            MARGIN + half / 2.0,
            body + 20.0,
            TextStyle::new(10.0).bold().centered(),
            &self.template.coordinator_name,
        );
        svg.text(
            MARGIN + half / 2.0,
            body + 34.0,
            TextStyle::new(8.0).centered(),
            &self.template.coordinator_title,
        );
        svg.text_in_box(
            MARGIN + half,
            body,
            half,
            44.0,
            TextStyle::new(10.0).centered(),
            &self.template.date_issued,
        );

        body + 44.0
    }

    fn levels_table(&self, svg: &mut SvgWriter, y: f32) -> f32 {
        let widths = [110.0, 150.0, CONTENT_WIDTH - 260.0];
        let head = TextStyle::new(9.0).bold().fill(PRIMARY);

        let mut x = MARGIN;
        for (w, label) in widths.iter().zip(["LEVEL", "NAME", "DESCRIPTION"]) {
            svg.rect(x, y, *w, 22.0, TINT, Some(BORDER));
            svg.text_in_box(x, y, *w, 22.0, head, label);
            x += w;
        }

        let mut y = y + 22.0;
        for level in &self.template.levels {
            let lines = wrap_text(&level.description, 85);
            let height = (lines.len().max(1) as f32 * 12.0 + 12.0).max(28.0);

            let mut x = MARGIN;
            for w in widths {
                svg.rect(x, y, w, height, WHITE, Some(BORDER));
                x += w;
            }
            svg.text_in_box(MARGIN, y, widths[0], height, TextStyle::new(9.0).bold(), &level.level);
            svg.text_in_box(MARGIN + widths[0], y, widths[1], height, TextStyle::new(9.0), &level.name);
            svg.paragraph(
                MARGIN + widths[0] + widths[1] + 4.0,
                y + 15.0,
                12.0,
                TextStyle::new(9.0),
                &lines,
            );
            y += height;
        }
        y
    }

    /// Height the partner logos and footer occupy at the bottom of a page
    fn bottom_reserve(&self) -> f32 {
        let band = if !self.assets.partner_logos.is_empty() {
            PARTNER_BAND
        } else if self.assets.footer.is_some() {
            FOOTER_IMAGE_HEIGHT
        } else {
            FOOTER_BAR_HEIGHT
        };
        band + BAND_GAP
    }

    fn partner_logos(&self, svg: &mut SvgWriter, page_height: f32) {
        let logos = &self.assets.partner_logos;
        if logos.is_empty() {
            return;
        }
        let slot = CONTENT_WIDTH / logos.len() as f32;
        let y = page_height - PARTNER_BAND;
        for (i, href) in logos.iter().enumerate() {
            svg.image(MARGIN + slot * i as f32 + 8.0, y, slot - 16.0, 50.0, href);
        }
    }

    fn footer(&self, svg: &mut SvgWriter, page_height: f32) {
        match &self.assets.footer {
            Some(href) => {
                let top = page_height - FOOTER_IMAGE_HEIGHT;
                svg.image(0.0, top, PAGE_WIDTH, FOOTER_IMAGE_HEIGHT, href);
            }
            None => {
                let top = page_height - FOOTER_BAR_HEIGHT;
                svg.rect(0.0, top, PAGE_WIDTH, FOOTER_BAR_HEIGHT, PRIMARY_DARK, None);
                svg.text_in_box(
                    0.0,
                    top,
                    PAGE_WIDTH,
                    FOOTER_BAR_HEIGHT,
                    TextStyle::new(9.0).fill(WHITE).centered(),
                    &self.template.institution,
                );
            }
        }
    }
}

fn section_bar(svg: &mut SvgWriter, y: f32, label: &str) -> f32 {
    svg.rect(MARGIN, y, CONTENT_WIDTH, 20.0, PRIMARY, None);
    svg.text_in_box(
        MARGIN,
        y,
        CONTENT_WIDTH,
        20.0,
        TextStyle::new(10.0).bold().fill(WHITE).centered(),
        label,
    );
    y + 20.0
}

fn student_info(svg: &mut SvgWriter, y: f32, group: &StudentGroup) -> f32 {
    let first = group.first();
    let value = |field: Field| first.map(|c| c.text(field)).unwrap_or("");

    let rows = [
        [("NAME", group.key()), ("IEC NUMBER", value(Field::Number))],
        [("TERM", value(Field::Term)), ("PROGRAM", value(Field::Program))],
        [("LEVEL", value(Field::Level)), ("STATUS", value(Field::Status))],
    ];
    let widths = [120.0, 240.0];

    let mut y = y;
    for row in rows {
        let mut x = MARGIN;
        for (label, text) in row {
            svg.rect(x, y, widths[0], 22.0, TINT, Some(BORDER));
            svg.text_in_box(x, y, widths[0], 22.0, TextStyle::new(9.0).bold().fill(PRIMARY), label);
            x += widths[0];
            svg.rect(x, y, widths[1], 22.0, WHITE, Some(BORDER));
            svg.text_in_box(x, y, widths[1], 22.0, TextStyle::new(9.0), &truncate(text, 44));
            x += widths[1];
        }
        y += 22.0;
    }
    y
}

fn course_table(svg: &mut SvgWriter, y: f32, group: &StudentGroup) -> f32 {
    let head = TextStyle::new(7.5).bold().fill(PRIMARY).centered();
    let mut x = MARGIN;
    for (w, first, second) in COURSE_COLUMNS {
        svg.rect(x, y, w, 28.0, TINT, Some(BORDER));
        if second.is_empty() {
            svg.text_in_box(x, y, w, 28.0, head, first);
        } else {
            svg.text(x + w / 2.0, y + 12.0, head, first);
            svg.text(x + w / 2.0, y + 22.0, head, second);
        }
        x += w;
    }

    let top = y + 28.0;
    let count = group.len().max(1);
    let row_height = (COURSE_AREA / count as f32).clamp(12.0, 20.0);
    let font = if row_height < 16.0 { 7.0 } else { 8.0 };

    for (i, course) in group.courses().enumerate() {
        let row_y = top + row_height * i as f32;
        let mut x = MARGIN;
        for ((w, _, _), field) in COURSE_COLUMNS.iter().zip(COURSE_FIELDS) {
            svg.rect(x, row_y, *w, row_height, WHITE, Some(BORDER));
            let value = course.text(field);
            if field == Field::CourseName {
                let style = TextStyle::new(font);
                svg.text_in_box(x, row_y, *w, row_height, style, &truncate(value, 34));
            } else if field == Field::CourseGrade {
                let style = TextStyle::new(font).bold().fill(grade_color(value)).centered();
                svg.text_in_box(x, row_y, *w, row_height, style, value);
            } else {
                let style = TextStyle::new(font).centered();
                svg.text_in_box(x, row_y, *w, row_height, style, &truncate(value, 12));
            }
            x += w;
        }
    }

    // Attendance spans every course row
    let rows_height = row_height * count as f32;
    let (att_width, _, _) = COURSE_COLUMNS[COURSE_COLUMNS.len() - 1];
    let att_x = MARGIN + CONTENT_WIDTH - att_width;
    svg.rect(att_x, top, att_width, rows_height, WHITE, Some(BORDER));
    svg.text_in_box(
        att_x,
        top,
        att_width,
        rows_height,
        TextStyle::new(12.0).bold().centered(),
        &format_attendance(group.attendance_average()),
    );

    // Level score row
    let score_y = top + rows_height;
    svg.rect(MARGIN, score_y, CONTENT_WIDTH, 20.0, TINT, Some(BORDER));
    let course_width = COURSE_COLUMNS[0].0;
    svg.text_in_box(
        MARGIN + course_width,
        score_y,
        300.0,
        20.0,
        TextStyle::new(8.0).bold().fill(PRIMARY),
        "*LEVEL SCORE",
    );
    svg.text_in_box(
        att_x - 60.0,
        score_y,
        60.0,
        20.0,
        TextStyle::new(8.0).bold().fill(PRIMARY).centered(),
        "PASS / FAIL",
    );

    score_y + 20.0
}

/// Whole-percent attendance, or "N/A" when no entry was numeric
pub fn format_attendance(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{}%", avg.round() as i64),
        None => "N/A".to_string(),
    }
}

/// Text color for a letter grade
pub fn grade_color(grade: &str) -> &'static str {
    match grade.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('A') => "#15803d",
        Some('B') => "#0369a1",
        Some('C') => "#a16207",
        Some('D') => "#c2410c",
        Some('F') => "#b91c1c",
        _ => "#1f2937",
    }
}
