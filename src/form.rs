use crate::error::FormError;
use crate::models::{BusinessField, BusinessInfo};

pub const TONES: [&str; 6] = [
    "Professional",
    "Friendly",
    "Humorous",
    "Luxurious",
    "Adventurous",
    "Minimalist",
];

pub const CALLS_TO_ACTION: [&str; 6] = [
    "Learn More",
    "Shop Now",
    "Sign Up",
    "Contact Us",
    "Get Started",
    "Book Now",
];

pub const DEFAULT_CALL_TO_ACTION: &str = "Learn More";
pub const DEFAULT_TONE: &str = "Professional";

/// Fields rendered as required inputs. The selects always carry a value.
pub const REQUIRED_FIELDS: [BusinessField; 4] = [
    BusinessField::Name,
    BusinessField::Description,
    BusinessField::Product,
    BusinessField::TargetAudience,
];

/// The editable draft behind the form screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    info: BusinessInfo,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            info: BusinessInfo {
                call_to_action: DEFAULT_CALL_TO_ACTION.to_string(),
                tone: DEFAULT_TONE.to_string(),
                ..BusinessInfo::default()
            },
        }
    }
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &BusinessInfo {
        &self.info
    }

    pub fn get(&self, field: BusinessField) -> &str {
        self.info.get(field)
    }

    pub fn set_field(&mut self, field: BusinessField, value: impl Into<String>) {
        *self.info.slot_mut(field) = value.into();
    }

    /// Applies posted `(name, value)` pairs; names that aren't form fields are skipped.
    pub fn apply<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in pairs {
            match name.parse::<BusinessField>() {
                Ok(field) => self.set_field(field, value),
                Err(e) => log::warn!("Ignoring posted value: {}", e),
            }
        }
    }

    pub fn missing_fields(&self) -> Vec<BusinessField> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Hands the whole draft downstream. Only presence is checked.
    pub fn submit(&self) -> Result<BusinessInfo, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        Ok(self.info.clone())
    }
}
