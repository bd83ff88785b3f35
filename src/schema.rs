//! Declarative field descriptors for every form and the validator shared by them.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\$)?\d+(\.\d{2})?$").expect("valid price pattern"));
static TAGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#\w+(,\s*#\w+)*)?$").expect("valid tags pattern"));
static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid count pattern"));
static STORE_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(amazon|etsy|pinterest)$").expect("valid store type pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Password,
    Integer,
    Url,
    Select,
    Image,
}

/// When a field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    /// Required when creating; hidden and ignored when editing.
    OnCreate,
    /// Required when creating; optional when editing.
    CreateOnly,
    Optional,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
    pub pattern: Option<&'static Lazy<Regex>>,
    pub min_length: Option<usize>,
    pub hint: Option<&'static str>,
}

impl FieldSpec {
    const fn new(name: &'static str, title: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            title,
            kind,
            requirement: Requirement::Optional,
            pattern: None,
            min_length: None,
            hint: None,
        }
    }

    const fn required(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    const fn pattern(mut self, pattern: &'static Lazy<Regex>, hint: &'static str) -> Self {
        self.pattern = Some(pattern);
        self.hint = Some(hint);
        self
    }

    const fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Whether the field is shown in the given mode.
    pub fn visible(&self, editing: bool) -> bool {
        !(editing && self.requirement == Requirement::OnCreate)
    }

    fn is_required(&self, editing: bool) -> bool {
        match self.requirement {
            Requirement::Always => true,
            Requirement::OnCreate | Requirement::CreateOnly => !editing,
            Requirement::Optional => false,
        }
    }

    fn check(&self, value: Option<&str>, editing: bool) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            return self
                .is_required(editing)
                .then(|| format!("{} is required", self.title));
        };

        if let Some(min) = self.min_length {
            if value.chars().count() < min {
                return Some(format!("{} must be at least {} characters", self.title, min));
            }
        }
        match self.kind {
            FieldKind::Email if !EMAIL_RE.is_match(value) => {
                return Some(format!("{} must be a valid email address", self.title));
            }
            FieldKind::Url if Url::parse(value).is_err() => {
                return Some(format!("{} must be a valid URL", self.title));
            }
            _ => {}
        }
        if let Some(pattern) = self.pattern {
            if !pattern.is_match(value) {
                let hint = self.hint.unwrap_or("invalid format");
                return Some(format!("{}: {}", self.title, hint));
            }
        }
        None
    }
}

/// Read access to a form's current field values, keyed by wire name.
pub trait FormState {
    fn value(&self, field: &str) -> Option<&str>;
}

pub struct FormSchema {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every visible field; an empty result means the form may be submitted.
    pub fn validate(&self, state: &dyn FormState, editing: bool) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in self.fields.iter().filter(|f| f.visible(editing)) {
            if let Some(message) = field.check(state.value(field.name), editing) {
                errors.0.insert(field.name, message);
            }
        }
        errors
    }
}

/// Per-field error text, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

pub static LOGIN_FORM: FormSchema = FormSchema {
    title: "Login",
    fields: &[
        FieldSpec::new("email", "Email", FieldKind::Email).required(Requirement::Always),
        FieldSpec::new("password", "Password", FieldKind::Password).required(Requirement::Always),
    ],
};

pub static REGISTRATION_FORM: FormSchema = FormSchema {
    title: "Register",
    fields: &[
        FieldSpec::new("businessName", "Business Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Email).required(Requirement::Always),
        FieldSpec::new("password", "Password", FieldKind::Password)
            .required(Requirement::Always)
            .min_length(6),
    ],
};

pub static PRODUCT_FORM: FormSchema = FormSchema {
    title: "Product",
    fields: &[
        FieldSpec::new("productName", "Product Name", FieldKind::Text)
            .required(Requirement::Always),
        FieldSpec::new("description", "Description", FieldKind::TextArea)
            .required(Requirement::Always),
        FieldSpec::new("price", "Price", FieldKind::Text)
            .required(Requirement::Always)
            .pattern(&PRICE_RE, "enter the price in dollars (e.g., $12.99)"),
        FieldSpec::new("count", "Count", FieldKind::Integer)
            .pattern(&COUNT_RE, "must be a whole number of at least 0"),
        FieldSpec::new("tags", "Tags", FieldKind::TextArea).pattern(
            &TAGS_RE,
            "enter tags starting with '#' separated by commas (e.g., #sale, #new)",
        ),
        FieldSpec::new("image", "Image", FieldKind::Image).required(Requirement::CreateOnly),
    ],
};

pub static STOREFRONT_FORM: FormSchema = FormSchema {
    title: "Storefront Link",
    fields: &[
        FieldSpec::new("storeType", "Storefront Type", FieldKind::Select)
            .required(Requirement::Always)
            .pattern(&STORE_TYPE_RE, "select amazon, etsy or pinterest"),
        FieldSpec::new("storeName", "Link Name", FieldKind::Text),
        FieldSpec::new("apiKey", "API Key", FieldKind::Password).required(Requirement::OnCreate),
        FieldSpec::new("apiSecret", "API Secret", FieldKind::Password)
            .required(Requirement::OnCreate),
        FieldSpec::new("storeId", "Store ID", FieldKind::Text),
        FieldSpec::new("storeUrl", "Store URL", FieldKind::Url),
    ],
};
