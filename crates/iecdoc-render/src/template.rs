//! Static transcript content: labels, remarks, grading scale, levels, assets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Text and assets shared by every transcript in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptTemplate {
    /// Institution name, shown in the header band when no logo is set
    pub institution: String,
    /// Title printed above the student information
    pub title: String,
    /// Name printed in the signature block
    pub coordinator_name: String,
    /// Role printed under the coordinator name
    pub coordinator_title: String,
    /// "Date issued" cell of the signature block
    pub date_issued: String,
    /// Remarks paragraph
    pub remarks: String,
    /// Grading scale legend, left to right
    pub grading_scale: Vec<GradeBand>,
    /// Program levels listed on the second page
    pub levels: Vec<LevelDescriptor>,
    /// Image files placed on every page
    pub assets: AssetPaths,
}

impl Default for TranscriptTemplate {
    fn default() -> Self {
        Self {
            institution: "Intensive English Center".to_string(),
            title: "OFFICIAL TRANSCRIPT".to_string(),
            coordinator_name: String::new(),
            coordinator_title: "IEC Coordinator".to_string(),
            date_issued: String::new(),
            remarks: default_remarks(),
            grading_scale: default_grading_scale(),
            levels: default_levels(),
            assets: AssetPaths::default(),
        }
    }
}

/// One column of the grading scale legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    /// Letter grade
    pub grade: String,
    /// Score range, e.g. "100-90"
    pub range: String,
    /// Emphasized first word of the description
    pub headline: String,
    /// Rest of the description
    pub description: String,
}

impl GradeBand {
    fn new(grade: &str, range: &str, headline: &str, description: &str) -> Self {
        Self {
            grade: grade.to_string(),
            range: range.to_string(),
            headline: headline.to_string(),
            description: description.to_string(),
        }
    }
}

/// One row of the program levels table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Level label, e.g. "Level 3"
    pub level: String,
    /// Short name, e.g. "Intermediate"
    pub name: String,
    /// Outcome summary
    pub description: String,
}

impl LevelDescriptor {
    fn new(level: &str, name: &str, description: &str) -> Self {
        Self {
            level: level.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Optional image files; missing files are skipped at layout time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Header logo
    pub logo: Option<PathBuf>,
    /// Footer banner
    pub footer: Option<PathBuf>,
    /// Partner/accreditation logos, left to right
    pub partner_logos: Vec<PathBuf>,
    /// Images replacing the levels table on the second page
    pub level_images: Vec<PathBuf>,
}

fn default_remarks() -> String {
    "*For students with full-course load, the level score is calculated by taking a \
     weighted average of all course scores for the respective level. The weighting of \
     the course score relative to level score is determined by taking the weekly \
     contact hours of that course into consideration. The weighting is calculated by \
     multiplying the number of weekly hours with 4.55 and then dividing it to 100."
        .to_string()
}

fn default_grading_scale() -> Vec<GradeBand> {
    vec![
        GradeBand::new(
            "A",
            "100-90",
            "Excellent",
            "work of exceptional quality which indicates the highest level of attainment in a course",
        ),
        GradeBand::new(
            "B",
            "89-80",
            "Good",
            "work above average which indicates a high level of achievement",
        ),
        GradeBand::new(
            "C",
            "79-70",
            "Average",
            "work of average quality representing substantial fulfillment of the minimum essentials",
        ),
        GradeBand::new(
            "D",
            "69-60",
            "Poor",
            "but may represent passing if average level score is 70 and above",
        ),
        GradeBand::new(
            "F",
            "59-0",
            "Failure",
            "representing unacceptable performance in the course",
        ),
        GradeBand::new("W", "0", "Withdrawal", "official withdrawal from a course or level"),
        GradeBand::new("I", "0", "Incomplete", "work"),
        GradeBand::new(
            "N/A",
            "0",
            "Failure",
            "to meet the attendance requirement without valid reason",
        ),
    ]
}

fn default_levels() -> Vec<LevelDescriptor> {
    vec![
        LevelDescriptor::new(
            "Level 1",
            "Beginner",
            "Understands and uses familiar everyday expressions and very basic phrases.",
        ),
        LevelDescriptor::new(
            "Level 2",
            "High Beginner",
            "Communicates in simple and routine tasks on familiar topics.",
        ),
        LevelDescriptor::new(
            "Level 3",
            "Intermediate",
            "Deals with most situations and produces simple connected text on familiar topics.",
        ),
        LevelDescriptor::new(
            "Level 4",
            "High Intermediate",
            "Understands the main ideas of complex text and interacts with some fluency.",
        ),
        LevelDescriptor::new(
            "Level 5",
            "Advanced",
            "Produces clear, detailed text and follows extended academic discourse.",
        ),
        LevelDescriptor::new(
            "Level 6",
            "Academic Bridge",
            "Uses language flexibly and effectively for academic and professional purposes.",
        ),
    ]
}
