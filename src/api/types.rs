use serde::{Deserialize, Serialize};

use crate::wizard::form::FormAttributes;

/// Response shape shared by the generate and refine endpoints. Every field is
/// optional on the wire; missing candidates are filled by the caller from its
/// fallback values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateResponse {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineRequest<'a> {
    pub selected: &'a str,
    pub note: &'a str,
    pub context: &'a FormAttributes,
}

#[derive(Debug, Serialize)]
pub struct CompleteRequest<'a> {
    #[serde(rename = "imageUrl")]
    pub image_url: &'a str,
    pub meta: &'a FormAttributes,
}
