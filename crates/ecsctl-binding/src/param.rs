//! Parameter declarations.
//!
//! A [`ParamSpec`] is one flag on a command's surface. Specs are declared in
//! `static` tables, so every builder method here is a `const fn`.

/// Semantic type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    /// 32-bit signed integer (every ECS integer member fits).
    Integer,
    Boolean,
    /// String constrained to known values. Unknown values are passed through
    /// with a warning; the service has the final word.
    Enum(&'static [&'static str]),
    StringList,
    /// `key=value` entries.
    Map,
    /// JSON objects deserialized into a typed element shape at assembly.
    StructList,
}

impl ParamType {
    pub fn is_collection(self) -> bool {
        matches!(self, Self::StringList | Self::Map | Self::StructList)
    }

    /// Short human-readable name used in errors and `--help`.
    pub fn describe(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::StringList => "string list",
            Self::Map => "key=value map",
            Self::StructList => "JSON object list",
        }
    }

    /// Case-insensitive lookup of an enum value, returning the canonical spelling.
    pub fn canonical_enum(values: &'static [&'static str], raw: &str) -> Option<&'static str> {
        values.iter().copied().find(|v| v.eq_ignore_ascii_case(raw))
    }
}

/// One declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    pub aliases: &'static [&'static str],
    /// Whether the parameter may take its value from piped input.
    pub pipeline: bool,
    pub help: &'static str,
}

impl ParamSpec {
    pub const fn new(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: false,
            aliases: &[],
            pipeline: false,
            help: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn pipeline(mut self) -> Self {
        self.pipeline = true;
        self
    }

    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// True if `name` is this parameter's name or one of its aliases
    /// (ASCII case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Parse a boolean the way the shell surface accepts it.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "$true" => Some(true),
        "false" | "0" | "no" | "$false" => Some(false),
        _ => None,
    }
}
