use crate::error::ConfigError;
use crate::models::GeneratedAd;
use std::fmt;
use std::str::FromStr;

/// How the button label on the preview card is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CtaLabelMode {
    /// "Shop Now" when the image prompt mentions "Shop", otherwise "Learn More".
    /// Ignores the user's selection, which looks like a bug. `Selected` is the alternative.
    #[default]
    Heuristic,
    /// The call to action picked on the form.
    Selected,
}

impl FromStr for CtaLabelMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(CtaLabelMode::Heuristic),
            "selected" => Ok(CtaLabelMode::Selected),
            other => Err(ConfigError::CtaLabelMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    X,
    LinkedIn,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 4] = [
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
        SocialPlatform::X,
        SocialPlatform::LinkedIn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::X => "X",
            SocialPlatform::LinkedIn => "LinkedIn",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::X => "x",
            SocialPlatform::LinkedIn => "linkedin",
        }
    }

    // Demo only, nothing leaves the machine
    pub fn simulate_upload(self) -> String {
        log::info!("Simulated upload to {}", self.name());
        format!("Uploading to {}... (demo)", self.name())
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocialPlatform::ALL
            .into_iter()
            .find(|platform| platform.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown platform: {}", s))
    }
}

pub fn cta_label<'a>(ad: &GeneratedAd, selected: &'a str, mode: CtaLabelMode) -> &'a str {
    match mode {
        CtaLabelMode::Heuristic if ad.ad_copy.image_prompt.contains("Shop") => "Shop Now",
        CtaLabelMode::Heuristic => "Learn More",
        CtaLabelMode::Selected => selected,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPreview<'a> {
    pub headline: &'a str,
    pub body: &'a str,
    pub image_url: &'a str,
    pub cta_label: &'a str,
}

impl<'a> AdPreview<'a> {
    pub fn new(ad: &'a GeneratedAd, selected_cta: &'a str, mode: CtaLabelMode) -> Self {
        Self {
            headline: &ad.ad_copy.headline,
            body: &ad.ad_copy.body,
            image_url: &ad.image_url,
            cta_label: cta_label(ad, selected_cta, mode),
        }
    }
}
