//! Template catalog: (role, grade, language) -> task list + 30/60/90 plan.
//!
//! The catalog is built once at startup (from the built-in tables or a YAML
//! file) and shared read-only afterwards. Lookups never fail: an unknown
//! (role, grade) resolves to the default template and an unknown language
//! resolves to the English variant.

use crate::catalog_data::{VariantRows, BUILTIN_TEMPLATES};
use crate::error::{OnboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Template used when the requested (role, grade) has no entry
pub const DEFAULT_TEMPLATE_KEY: &str = "general_newgrad";

/// Language every template entry must provide
pub const DEFAULT_LANGUAGE: &str = "en";

/// Who a generated task belongs to, before names are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOwner {
    Employee,
    Manager,
    Hr,
}

impl TaskOwner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Hr => "hr",
        }
    }
}

impl fmt::Display for TaskOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task in a template, with its due date expressed relative to the start date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub owner: TaskOwner,
    pub title: String,
    #[serde(alias = "desc")]
    pub description: String,
    /// Days after the start date (negative = before day 0)
    #[serde(alias = "offset")]
    pub offset_days: i64,
}

/// Goals at the 30, 60 and 90 day checkpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day30: String,
    pub day60: String,
    pub day90: String,
}

/// 30/60/90-day plan for both sides of the onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub employee: DayPlan,
    pub manager: DayPlan,
}

/// Task list and plan for a single language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariant {
    pub tasks: Vec<TaskSpec>,
    pub plan: Plan,
}

/// All language variants of one template. English is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub en: TemplateVariant,
    #[serde(flatten)]
    pub translations: BTreeMap<String, TemplateVariant>,
}

impl TemplateEntry {
    pub fn new(en: TemplateVariant) -> Self {
        Self {
            en,
            translations: BTreeMap::new(),
        }
    }

    pub fn with_translation(mut self, language: &str, variant: TemplateVariant) -> Self {
        if language != DEFAULT_LANGUAGE {
            self.translations.insert(language.to_string(), variant);
        }
        self
    }

    /// Variant for `language`, or English when that language is missing
    pub fn variant(&self, language: &str) -> &TemplateVariant {
        if language == DEFAULT_LANGUAGE {
            return &self.en;
        }
        self.translations.get(language).unwrap_or(&self.en)
    }

    pub fn has_language(&self, language: &str) -> bool {
        language == DEFAULT_LANGUAGE || self.translations.contains_key(language)
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut langs = vec![DEFAULT_LANGUAGE];
        langs.extend(self.translations.keys().map(String::as_str));
        langs
    }
}

/// Composite lookup key for a (role, grade) pair
pub fn template_key(role: &str, grade: &str) -> String {
    format!("{}_{}", role, grade)
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default = "default_template_key")]
    default_key: String,
    templates: BTreeMap<String, TemplateEntry>,
}

fn default_template_key() -> String {
    DEFAULT_TEMPLATE_KEY.to_string()
}

/// Read-only template catalog
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    default_key: String,
    default_entry: TemplateEntry,
    entries: BTreeMap<String, TemplateEntry>,
}

impl TemplateCatalog {
    /// Catalog with the templates shipped in the binary
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for rows in BUILTIN_TEMPLATES {
            let entry = TemplateEntry::new(variant_from_rows(&rows.en))
                .with_translation("ja", variant_from_rows(&rows.ja));
            entries.insert(rows.key.to_string(), entry);
        }

        let default_entry = entries
            .get(DEFAULT_TEMPLATE_KEY)
            .cloned()
            .unwrap_or_else(|| TemplateEntry::new(variant_from_rows(&BUILTIN_TEMPLATES[0].en)));

        Self {
            default_key: DEFAULT_TEMPLATE_KEY.to_string(),
            default_entry,
            entries,
        }
    }

    /// Build a catalog from explicit entries; the default key must be present
    pub fn from_entries(
        default_key: &str,
        entries: BTreeMap<String, TemplateEntry>,
    ) -> Result<Self> {
        let default_entry = entries.get(default_key).cloned().ok_or_else(|| {
            OnboardError::Catalog(format!(
                "default template '{}' is not defined ({} templates loaded)",
                default_key,
                entries.len()
            ))
        })?;

        Ok(Self {
            default_key: default_key.to_string(),
            default_entry,
            entries,
        })
    }

    /// Load a catalog from YAML:
    ///
    /// ```yaml
    /// default_key: general_newgrad
    /// templates:
    ///   general_newgrad:
    ///     en: { tasks: [...], plan: {...} }
    ///     ja: { tasks: [...], plan: {...} }
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_entries(&file.default_key, file.templates)
    }

    /// Resolve (role, grade) to an entry and the key that was actually used.
    ///
    /// Unknown combinations resolve to the default template; the returned key
    /// is the default key in that case, never the requested one.
    pub fn lookup(&self, role: &str, grade: &str) -> (&TemplateEntry, &str) {
        let key = template_key(role, grade);
        match self.entries.get_key_value(&key) {
            Some((resolved, entry)) => (entry, resolved.as_str()),
            None => (&self.default_entry, self.default_key.as_str()),
        }
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Template keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn variant_from_rows(rows: &VariantRows) -> TemplateVariant {
    let day_plan = |d: &[&str; 3]| DayPlan {
        day30: d[0].to_string(),
        day60: d[1].to_string(),
        day90: d[2].to_string(),
    };

    TemplateVariant {
        tasks: rows
            .tasks
            .iter()
            .map(|t| TaskSpec {
                owner: t.owner,
                title: t.title.to_string(),
                description: t.description.to_string(),
                offset_days: t.offset_days,
            })
            .collect(),
        plan: Plan {
            employee: day_plan(&rows.employee_plan),
            manager: day_plan(&rows.manager_plan),
        },
    }
}
