use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Lifecycle state of an insight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Live,
    Review,
    Draft,
    Retired,
    Archived,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Live,
        Status::Review,
        Status::Draft,
        Status::Retired,
        Status::Archived,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "live" => Some(Self::Live),
            "review" | "under-review" | "under_review" => Some(Self::Review),
            "draft" => Some(Self::Draft),
            "retired" => Some(Self::Retired),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Review => "review",
            Self::Draft => "draft",
            Self::Retired => "retired",
            Self::Archived => "archived",
        }
    }
}

/// Whether content is fixed text or carries runtime-substituted variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Static,
    Dynamic,
}

impl ContentType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "static" => Some(Self::Static),
            "dynamic" => Some(Self::Dynamic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Dynamic => "Dynamic",
        }
    }

    pub fn of(insight: &Insight) -> Self {
        if insight.is_dynamic {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

// Exporters write `null` for unset optional fields; read it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single Smart Facts record.
///
/// Only `id`, `content` and `status` are required on import. Everything else
/// falls back to absent/empty whether the key is missing or `null`, and `has_cta` is not cross-checked against
/// `cta`: consumers treat a missing `cta` as no call-to-action.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub content: String,
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_dynamic: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_cta: bool,
    #[serde(default)]
    pub cta: Option<Cta>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_context: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_primary_user: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_profile_complete: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template_keys: Vec<String>,
}

impl Insight {
    pub fn new(id: impl Into<String>, content: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status,
            priority: 0,
            is_dynamic: false,
            has_cta: false,
            cta: None,
            required_context: Vec::new(),
            requires_primary_user: false,
            requires_profile_complete: false,
            template_keys: Vec::new(),
        }
    }
}
