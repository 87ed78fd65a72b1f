//! Visual theme settings, one row per profile

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_status_conversions;

/// Page background kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum BgType {
    #[default]
    Color,
    Image,
}

impl_domain_status_conversions!(BgType {
    Color => "color",
    Image => "image",
});

/// Link button shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Rectangular,
    #[default]
    Rounded,
    Pill,
}

impl_domain_status_conversions!(ButtonStyle {
    Rectangular => "rectangular",
    Rounded => "rounded",
    Pill => "pill",
});

/// Theme row linked to a profile via `profile_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ThemeSettings {
    pub id: String,
    pub profile_id: String,
    pub bg_type: BgType,
    /// `#RRGGBB`
    pub bg_color: String,
    #[serde(default)]
    pub bg_image_url: Option<String>,
    pub button_style: ButtonStyle,
    pub button_bg_color: String,
    pub button_text_color: String,
    #[serde(default)]
    pub button_shadow: bool,
    pub font_family: String,
    pub text_color: String,
}

/// Partial theme update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_type: Option<BgType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub bg_image_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_style: Option<ButtonStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_shadow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl ThemeUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, theme: &mut ThemeSettings) {
        if let Some(bg_type) = self.bg_type {
            theme.bg_type = bg_type;
        }
        if let Some(bg_color) = &self.bg_color {
            theme.bg_color.clone_from(bg_color);
        }
        if let Some(bg_image_url) = &self.bg_image_url {
            theme.bg_image_url.clone_from(bg_image_url);
        }
        if let Some(button_style) = self.button_style {
            theme.button_style = button_style;
        }
        if let Some(color) = &self.button_bg_color {
            theme.button_bg_color.clone_from(color);
        }
        if let Some(color) = &self.button_text_color {
            theme.button_text_color.clone_from(color);
        }
        if let Some(shadow) = self.button_shadow {
            theme.button_shadow = shadow;
        }
        if let Some(font) = &self.font_family {
            theme.font_family.clone_from(font);
        }
        if let Some(color) = &self.text_color {
            theme.text_color.clone_from(color);
        }
    }
}
