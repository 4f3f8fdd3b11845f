//! Per-invocation parameter context.
//!
//! [`ContextBuilder`] takes bound values (from command-line text or typed
//! values), checks them against the command's [`ParamSpec`]s and stores a copy
//! under the parameter's canonical name. [`Context`] is the frozen snapshot
//! the assembler reads from.

use crate::descriptor::CommandDescriptor;
use crate::error::BindError;
use crate::param::{parse_bool, ParamSpec, ParamType};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Collects bound parameters for one invocation.
#[derive(Debug)]
pub struct ContextBuilder {
    descriptor: &'static CommandDescriptor,
    values: BTreeMap<&'static str, Value>,
    warnings: Vec<String>,
}

impl ContextBuilder {
    pub fn new(descriptor: &'static CommandDescriptor) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> &'static CommandDescriptor {
        self.descriptor
    }

    /// Whether `name` (or one of its aliases) already has a value.
    pub fn is_bound(&self, name: &str) -> bool {
        self.descriptor
            .param(name)
            .is_some_and(|spec| self.values.contains_key(spec.name))
    }

    fn spec(&self, name: &str) -> Result<&'static ParamSpec, BindError> {
        let descriptor = self.descriptor;
        descriptor
            .param(name)
            .ok_or_else(|| BindError::UnknownParameter {
                command: descriptor.name.to_string(),
                name: name.to_string(),
            })
    }

    /// Bind one occurrence of a parameter given as command-line text.
    ///
    /// Scalars replace any earlier value. Collections accumulate: list items
    /// append (commas split), map entries merge, struct lists extend.
    pub fn bind_text(&mut self, name: &str, raw: &str) -> Result<&mut Self, BindError> {
        let spec = self.spec(name)?;
        let invalid = || BindError::InvalidValue {
            param: spec.name.to_string(),
            expected: spec.ty.describe().to_string(),
            value: raw.to_string(),
        };

        match spec.ty {
            ParamType::String => {
                self.values.insert(spec.name, Value::String(raw.to_string()));
            }
            ParamType::Integer => {
                let n: i32 = raw.trim().parse().map_err(|_| invalid())?;
                self.values.insert(spec.name, Value::from(n));
            }
            ParamType::Boolean => {
                let b = parse_bool(raw).ok_or_else(invalid)?;
                self.values.insert(spec.name, Value::Bool(b));
            }
            ParamType::Enum(known) => {
                let value = self.enum_value(spec, known, raw);
                self.values.insert(spec.name, Value::String(value));
            }
            ParamType::StringList => {
                let items = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()));
                self.array_slot(spec.name).extend(items);
            }
            ParamType::Map => {
                let (key, value) = raw.split_once('=').ok_or_else(invalid)?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(invalid());
                }
                self.object_slot(spec.name)
                    .insert(key.to_string(), Value::String(value.trim().to_string()));
            }
            ParamType::StructList => {
                let parsed: Value =
                    serde_json::from_str(raw).map_err(|source| BindError::MalformedStruct {
                        param: spec.name.to_string(),
                        source,
                    })?;
                match parsed {
                    Value::Object(_) => self.array_slot(spec.name).push(parsed),
                    Value::Array(items) if items.iter().all(Value::is_object) => {
                        self.array_slot(spec.name).extend(items)
                    }
                    _ => return Err(invalid()),
                }
            }
        }
        Ok(self)
    }

    /// Bind a typed value, replacing any earlier value.
    ///
    /// A scalar given for a list parameter is wrapped into a one-element list.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, BindError> {
        let spec = self.spec(name)?;
        let value = value.into();
        let invalid = |value: &Value| BindError::InvalidValue {
            param: spec.name.to_string(),
            expected: spec.ty.describe().to_string(),
            value: value.to_string(),
        };

        let checked = match (spec.ty, value) {
            (ParamType::String, v @ Value::String(_)) => v,
            (ParamType::Integer, Value::Number(n)) => {
                match n.as_i64().and_then(|n| i32::try_from(n).ok()) {
                    Some(n) => Value::from(n),
                    None => return Err(invalid(&Value::Number(n))),
                }
            }
            (ParamType::Boolean, v @ Value::Bool(_)) => v,
            (ParamType::Enum(known), Value::String(s)) => {
                Value::String(self.enum_value(spec, known, &s))
            }
            (ParamType::StringList, v @ Value::String(_)) => Value::Array(vec![v]),
            (ParamType::StringList, Value::Array(items)) if items.iter().all(Value::is_string) => {
                Value::Array(items)
            }
            (ParamType::Map, Value::Object(entries)) if entries.values().all(Value::is_string) => {
                Value::Object(entries)
            }
            (ParamType::StructList, v @ Value::Object(_)) => Value::Array(vec![v]),
            (ParamType::StructList, Value::Array(items)) if items.iter().all(Value::is_object) => {
                Value::Array(items)
            }
            (_, other) => return Err(invalid(&other)),
        };
        self.values.insert(spec.name, checked);
        Ok(self)
    }

    /// Bind a string list, copying the caller's items.
    pub fn bind_strings<S: AsRef<str>>(
        &mut self,
        name: &str,
        items: &[S],
    ) -> Result<&mut Self, BindError> {
        let copied: Vec<Value> = items
            .iter()
            .map(|s| Value::String(s.as_ref().to_string()))
            .collect();
        self.bind(name, Value::Array(copied))
    }

    /// Bind a map, copying the caller's entries.
    pub fn bind_map<K, V>(
        &mut self,
        name: &str,
        entries: &BTreeMap<K, V>,
    ) -> Result<&mut Self, BindError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let copied: Map<String, Value> = entries
            .iter()
            .map(|(k, v)| (k.as_ref().to_string(), Value::String(v.as_ref().to_string())))
            .collect();
        self.bind(name, Value::Object(copied))
    }

    /// Freeze the bound values. Required parameters without a value produce a
    /// warning only; the request still goes out and the service decides.
    pub fn finish(mut self) -> Context {
        for spec in self.descriptor.params.iter().filter(|p| p.required) {
            let missing = match self.values.get(spec.name) {
                None => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(Value::Array(a)) => a.is_empty(),
                Some(Value::Object(o)) => o.is_empty(),
                Some(_) => false,
            };
            if missing {
                let warning = format!(
                    "required parameter '{}' of {} has no value; sending the request anyway",
                    spec.name, self.descriptor.name
                );
                tracing::warn!("{warning}");
                self.warnings.push(warning);
            }
        }

        Context {
            descriptor: self.descriptor,
            values: self.values,
            warnings: self.warnings,
        }
    }

    fn enum_value(&mut self, spec: &ParamSpec, known: &'static [&'static str], raw: &str) -> String {
        match ParamType::canonical_enum(known, raw) {
            Some(canonical) => canonical.to_string(),
            None => {
                let warning = format!(
                    "{}: '{}' is not one of {}; passing it through",
                    spec.name,
                    raw,
                    known.join(", ")
                );
                tracing::warn!("{warning}");
                self.warnings.push(warning);
                raw.to_string()
            }
        }
    }

    fn array_slot(&mut self, name: &'static str) -> &mut Vec<Value> {
        let slot = self
            .values
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(items) => items,
            _ => unreachable!("slot was just made an array"),
        }
    }

    fn object_slot(&mut self, name: &'static str) -> &mut Map<String, Value> {
        let slot = self
            .values
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(entries) => entries,
            _ => unreachable!("slot was just made an object"),
        }
    }
}

/// Frozen, per-invocation snapshot of bound parameter values.
#[derive(Debug, Clone)]
pub struct Context {
    descriptor: &'static CommandDescriptor,
    values: BTreeMap<&'static str, Value>,
    warnings: Vec<String>,
}

impl Context {
    pub fn descriptor(&self) -> &'static CommandDescriptor {
        self.descriptor
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Unlike [`Context::value`], accepts names the command does not declare.
    pub fn is_bound(&self, name: &str) -> bool {
        self.descriptor
            .param(name)
            .is_some_and(|spec| self.values.contains_key(spec.name))
    }

    /// Raw bound value for a parameter (by name or alias).
    pub fn value(&self, name: &str) -> Option<&Value> {
        let spec = self.descriptor.param(name);
        debug_assert!(
            spec.is_some(),
            "{} declares no parameter '{}'",
            self.descriptor.name,
            name
        );
        self.values.get(spec?.name)
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.value(name)?.as_str().map(str::to_string)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        self.value(name)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.value(name)?.as_bool()
    }

    pub fn strings(&self, name: &str) -> Option<Vec<String>> {
        let items = self.value(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    pub fn map(&self, name: &str) -> Option<BTreeMap<String, String>> {
        let entries = self.value(name)?.as_object()?;
        Some(
            entries
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect(),
        )
    }

    /// Deserialize a struct-list parameter into its element shape.
    pub fn structs<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>, BindError> {
        let Some(value) = self.value(name) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| BindError::MalformedStruct {
                param: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::fixtures::DESCRIPTOR;
    use serde::Deserialize;
    use serde_json::json;

    fn builder() -> ContextBuilder {
        ContextBuilder::new(&DESCRIPTOR)
    }

    #[test]
    fn text_scalars_are_typed() {
        let mut b = builder();
        b.bind_text("Cluster", "default").unwrap();
        b.bind_text("DesiredCount", "2").unwrap();
        b.bind_text("EnableExecuteCommand", "true").unwrap();
        let ctx = b.finish();
        assert_eq!(ctx.string("Cluster").as_deref(), Some("default"));
        assert_eq!(ctx.int("DesiredCount"), Some(2));
        assert_eq!(ctx.boolean("EnableExecuteCommand"), Some(true));
    }

    #[test]
    fn bad_integer_is_a_bind_error() {
        let err = builder().bind_text("DesiredCount", "two").unwrap_err();
        assert!(matches!(err, BindError::InvalidValue { ref param, .. } if param == "DesiredCount"));
    }

    #[test]
    fn unknown_parameter_is_a_bind_error() {
        let err = builder().bind_text("Colour", "red").unwrap_err();
        assert!(matches!(err, BindError::UnknownParameter { .. }));
    }

    #[test]
    fn aliases_store_under_canonical_name() {
        let mut b = builder();
        b.bind_text("Subnet", "subnet-1,subnet-2").unwrap();
        b.bind_text("subnet", "subnet-3").unwrap();
        let ctx = b.finish();
        assert_eq!(
            ctx.strings("AwsvpcConfiguration_Subnet").unwrap(),
            vec!["subnet-1", "subnet-2", "subnet-3"]
        );
    }

    #[test]
    fn enum_is_canonicalised_and_unknown_passes_with_warning() {
        let mut b = builder();
        b.bind_text("LaunchType", "fargate").unwrap();
        assert_eq!(b.values["LaunchType"], json!("FARGATE"));

        b.bind_text("LaunchType", "LAMBDA").unwrap();
        let ctx = b.finish();
        assert_eq!(ctx.string("LaunchType").as_deref(), Some("LAMBDA"));
        assert!(ctx.warnings().iter().any(|w| w.contains("LAMBDA")));
    }

    #[test]
    fn map_entries_merge() {
        let mut b = builder();
        b.bind_text("Tag", "env=prod").unwrap();
        b.bind_text("Tags", "team = core").unwrap();
        b.bind_text("Tag", "env=dev").unwrap();
        let map = b.finish().map("Tag").unwrap();
        assert_eq!(map["env"], "dev");
        assert_eq!(map["team"], "core");
        assert!(builder().bind_text("Tag", "no-equals").is_err());
    }

    #[test]
    fn struct_list_accepts_objects_and_arrays() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Lb {
            container_name: String,
            container_port: i32,
        }

        let mut b = builder();
        b.bind_text("LoadBalancer", r#"{"containerName":"web","containerPort":80}"#)
            .unwrap();
        b.bind_text(
            "LoadBalancer",
            r#"[{"containerName":"api","containerPort":8080}]"#,
        )
        .unwrap();
        let lbs: Vec<Lb> = b.finish().structs("LoadBalancer").unwrap().unwrap();
        assert_eq!(lbs.len(), 2);
        assert_eq!(lbs[1].container_name, "api");
        assert_eq!(lbs[0].container_port, 80);

        let err = builder().bind_text("LoadBalancer", "{not json").unwrap_err();
        assert!(matches!(err, BindError::MalformedStruct { .. }));
    }

    #[test]
    fn struct_list_shape_mismatch_fails_at_assembly() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            port: i32,
        }
        let mut b = builder();
        b.bind_text("LoadBalancer", r#"{"port":"eighty"}"#).unwrap();
        let err = b.finish().structs::<Strict>("LoadBalancer").unwrap_err();
        assert!(matches!(err, BindError::MalformedStruct { .. }));
    }

    #[test]
    fn typed_bind_checks_shape() {
        let mut b = builder();
        b.bind("DesiredCount", 3).unwrap();
        b.bind("Subnet", "subnet-a").unwrap();
        assert!(b.bind("DesiredCount", "three").is_err());
        assert!(b.bind("DesiredCount", i64::from(i32::MAX) + 1).is_err());
        assert!(b.bind("EnableExecuteCommand", 1).is_err());
        let ctx = b.finish();
        assert_eq!(ctx.strings("Subnet").unwrap(), vec!["subnet-a"]);
    }

    #[test]
    fn collections_are_copied_not_aliased() {
        let mut subnets = vec!["subnet-1".to_string()];
        let mut tags = BTreeMap::from([("env".to_string(), "prod".to_string())]);

        let mut b = builder();
        b.bind_strings("Subnet", &subnets).unwrap();
        b.bind_map("Tag", &tags).unwrap();
        let ctx = b.finish();

        subnets.push("subnet-2".to_string());
        tags.insert("env".to_string(), "dev".to_string());

        assert_eq!(ctx.strings("Subnet").unwrap(), vec!["subnet-1"]);
        assert_eq!(ctx.map("Tag").unwrap()["env"], "prod");
    }

    #[test]
    fn missing_required_warns_but_does_not_fail() {
        let ctx = builder().finish();
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("ServiceName"));

        let mut b = builder();
        b.bind_text("ServiceName", "").unwrap();
        assert_eq!(b.finish().warnings().len(), 1);

        let mut b = builder();
        b.bind_text("ServiceName", "svc1").unwrap();
        assert!(b.finish().warnings().is_empty());
    }

    #[test]
    fn is_bound_resolves_aliases() {
        let mut b = builder();
        assert!(!b.is_bound("Subnet"));
        b.bind_text("AwsvpcConfiguration_Subnet", "s").unwrap();
        assert!(b.is_bound("subnet"));
        assert!(!b.is_bound("NotAParam"));
    }
}
