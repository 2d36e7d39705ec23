use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business attributes collected by the form and handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub name: String,
    pub description: String,
    pub target_audience: String,
    pub product: String,
    pub call_to_action: String,
    pub tone: String,
}

impl BusinessInfo {
    pub fn get(&self, field: BusinessField) -> &str {
        match field {
            BusinessField::Name => &self.name,
            BusinessField::Description => &self.description,
            BusinessField::TargetAudience => &self.target_audience,
            BusinessField::Product => &self.product,
            BusinessField::CallToAction => &self.call_to_action,
            BusinessField::Tone => &self.tone,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: BusinessField) -> &mut String {
        match field {
            BusinessField::Name => &mut self.name,
            BusinessField::Description => &mut self.description,
            BusinessField::TargetAudience => &mut self.target_audience,
            BusinessField::Product => &mut self.product,
            BusinessField::CallToAction => &mut self.call_to_action,
            BusinessField::Tone => &mut self.tone,
        }
    }
}

/// Names one attribute of [`BusinessInfo`], using the same wire names the form posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessField {
    Name,
    Description,
    TargetAudience,
    Product,
    CallToAction,
    Tone,
}

impl BusinessField {
    pub const ALL: [BusinessField; 6] = [
        BusinessField::Name,
        BusinessField::Description,
        BusinessField::Product,
        BusinessField::TargetAudience,
        BusinessField::Tone,
        BusinessField::CallToAction,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            BusinessField::Name => "name",
            BusinessField::Description => "description",
            BusinessField::TargetAudience => "targetAudience",
            BusinessField::Product => "product",
            BusinessField::CallToAction => "callToAction",
            BusinessField::Tone => "tone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BusinessField::Name => "Business Name",
            BusinessField::Description => "Business Description",
            BusinessField::TargetAudience => "Target Audience",
            BusinessField::Product => "Product/Service to Advertise",
            BusinessField::CallToAction => "Call to Action",
            BusinessField::Tone => "Ad Tone",
        }
    }
}

impl fmt::Display for BusinessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for BusinessField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Copy returned by the text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    pub headline: String,
    pub body: String,
    pub image_prompt: String,
}

/// A finished ad: the copy plus the picture as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAd {
    pub ad_copy: AdCopy,
    pub image_url: String,
}
