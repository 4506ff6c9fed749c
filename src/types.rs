use crate::constants::SOCIAL_PLATFORMS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Social profile links for a helper. The platform set is fixed; a blank
/// value means "no link" and must never be rendered as actionable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub linkedin: String,
}

impl SocialLinks {
    /// Returns the URL for a platform, or `None` when no link was provided.
    pub fn link(&self, platform: &str) -> Option<&str> {
        let value = match platform {
            "instagram" => &self.instagram,
            "twitter" => &self.twitter,
            "linkedin" => &self.linkedin,
            _ => return None,
        };
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Platform/link pairs in render order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        SOCIAL_PLATFORMS.iter().map(move |p| (*p, self.link(p)))
    }
}

/// A helper profile as stored in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Helper {
    /// Store-assigned row id. `None` only for an optimistic merge where the
    /// store did not echo the inserted row back; the confirming refetch
    /// replaces such entries with authoritative rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub social_media: SocialLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Helper {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The submitted form fields for a new helper; this is the insert payload.
/// Blank social links are preserved as empty strings, not omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelperDraft {
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub social_media: SocialLinks,
}

impl HelperDraft {
    /// Local stand-in for the inserted row when the store does not echo it.
    pub fn into_helper(self) -> Helper {
        Helper {
            id: None,
            first_name: self.first_name,
            last_name: self.last_name,
            description: self.description,
            category: self.category,
            social_media: self.social_media,
            created_at: None,
        }
    }
}

/// The (category, search term) pair driving the visible list. Blank input
/// normalizes to "no filter" so callers can pass raw user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub category: Option<String>,
    pub search_term: Option<String>,
}

impl FilterPredicate {
    pub fn new(category: Option<String>, search_term: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.trim().is_empty()),
            search_term: search_term.filter(|t| !t.trim().is_empty()),
        }
    }
}

/// The local mirror handed to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct DirectoryView {
    pub helpers: Vec<Helper>,
    pub loading: bool,
    pub last_error: Option<String>,
}
