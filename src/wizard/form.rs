use serde::Serialize;

/// User-entered gender attribute. Absent means "not answered yet", which the
/// backend receives as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// The attributes collected on the input step. Wire field names follow the
/// backend contract (`hair`, `similarTo`), not the internal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormAttributes {
    pub gender: Option<Gender>,
    #[serde(rename = "hair")]
    pub hairstyle: String,
    pub age: u8,
    #[serde(rename = "similarTo")]
    pub resemblance: String,
    pub features: String,
}

pub const DEFAULT_AGE: u8 = 22;

impl Default for FormAttributes {
    fn default() -> Self {
        FormAttributes {
            gender: None,
            hairstyle: String::new(),
            age: DEFAULT_AGE,
            resemblance: String::new(),
            features: String::new(),
        }
    }
}

/// A single keyed field update. Exactly one field per application, so updates
/// on distinct fields can never interfere with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormUpdate {
    Gender(Option<Gender>),
    Hairstyle(String),
    Age(u8),
    Resemblance(String),
    Features(String),
}

impl FormAttributes {
    /// Merges one field into the record, leaving every other field untouched.
    /// The store performs no validation; range limits (the [10,80] age bound)
    /// belong to the input boundary.
    pub fn update_field(&mut self, update: FormUpdate) {
        match update {
            FormUpdate::Gender(value) => self.gender = value,
            FormUpdate::Hairstyle(value) => self.hairstyle = value,
            FormUpdate::Age(value) => self.age = value,
            FormUpdate::Resemblance(value) => self.resemblance = value,
            FormUpdate::Features(value) => self.features = value,
        }
    }
}
