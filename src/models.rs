use serde::{Deserialize, Serialize};
use serde_json::Number;

// ---------------------------------------------------------------------------
// Raw records, as reported by the scanner
// ---------------------------------------------------------------------------

/// One file entry of a scanner run.
///
/// Every category is optional: a scan only fills the categories it was asked
/// for, and categories this tool does not know about are ignored.
///
/// Record fields are typed. A field holding an unexpected JSON type (say a
/// string `start_line`) fails the whole scan as malformed output instead of
/// being copied through; `null` reads as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFileScan {
    pub licenses: Option<Vec<RawLicenseMatch>>,
    pub copyrights: Option<Vec<RawCopyright>>,
    pub holders: Option<Vec<RawHolder>>,
    pub emails: Option<Vec<RawEmail>>,
    pub urls: Option<Vec<RawUrl>>,
}

/// A single license match. The scanner reports many more fields; only the
/// ones that survive projection are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLicenseMatch {
    pub key: Option<String>,
    pub score: Option<Number>,
    pub name: Option<String>,
    pub text_url: Option<String>,
    pub start_line: Option<u64>,
    pub matched_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCopyright {
    pub copyright: Option<String>,
    pub start_line: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHolder {
    pub holder: Option<String>,
    pub start_line: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEmail {
    pub email: Option<String>,
    pub start_line: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrl {
    pub url: Option<String>,
    pub start_line: Option<u64>,
}

// ---------------------------------------------------------------------------
// Projected records, as printed
// ---------------------------------------------------------------------------

/// A license match reduced to its public fields. Field names are kept as the
/// scanner reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

/// The flat `{value, start}` shape shared by copyrights, holders, emails and urls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
}

/// The merged report. All five buckets are always serialized, empty when the
/// category was not requested or had no findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanResult {
    pub licenses: Vec<LicenseRecord>,
    pub copyrights: Vec<ValueRecord>,
    pub holders: Vec<ValueRecord>,
    pub emails: Vec<ValueRecord>,
    pub urls: Vec<ValueRecord>,
}

/// Which categories to scan for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSelection {
    pub copyrights: bool,
    pub licenses: bool,
    pub emails: bool,
    pub urls: bool,
}

impl ScanSelection {
    pub fn is_empty(&self) -> bool {
        !(self.copyrights || self.licenses || self.emails || self.urls)
    }
}

/// A scan category, used for progress messages and scanner diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Copyrights,
    Licenses,
    Emails,
    Urls,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Copyrights => write!(f, "copyrights"),
            Category::Licenses => write!(f, "licenses"),
            Category::Emails => write!(f, "emails"),
            Category::Urls => write!(f, "urls"),
        }
    }
}
