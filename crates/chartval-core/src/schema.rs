//! # Schema Description Model
//!
//! The declarative model a validator consumes: typed field declarations
//! ([`FieldDef`]), object schemas with an extra-fields policy
//! ([`ObjectSchema`]), and discriminated conditionals
//! ([`ConditionalGroup`]) where an enum field selects exactly one of
//! several optional sibling sub-blocks.
//!
//! Schemas are built once at process start through [`ObjectSchema::builder`]
//! and never mutated. The builder checks structural invariants — every
//! conditional group must reference a declared enum discriminator, map only
//! declared variants, and point only at declared optional sub-blocks — so a
//! built schema is trustworthy by construction.

use serde_json::Value;

use crate::error::SchemaError;

/// Declared type of a configuration field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Boolean.
    Bool,
    /// Integer. JSON floats are rejected, even integral ones.
    Int,
    /// Any JSON number.
    Float,
    /// String.
    String,
    /// String restricted to a fixed set of variants. Discriminator fields
    /// are enum-typed.
    Enum(Vec<String>),
    /// Nested object with its own schema.
    Object(ObjectSchema),
    /// Homogeneous list.
    List(Box<FieldType>),
    /// String-keyed mapping with a homogeneous value type.
    Map(Box<FieldType>),
    /// Untagged union: the value must match at least one arm.
    OneOf(Vec<FieldType>),
    /// Opaque passthrough: any value is accepted and copied verbatim.
    Any,
}

impl FieldType {
    /// Short human-readable description, used in type-mismatch messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "boolean".to_string(),
            Self::Int => "integer".to_string(),
            Self::Float => "number".to_string(),
            Self::String => "string".to_string(),
            Self::Enum(variants) => format!("enum [{}]", variants.join(", ")),
            Self::Object(schema) => format!("object '{}'", schema.name()),
            Self::List(_) => "list".to_string(),
            Self::Map(_) => "mapping".to_string(),
            Self::OneOf(arms) => {
                let arms: Vec<String> = arms.iter().map(Self::describe).collect();
                format!("one of {}", arms.join(" | "))
            }
            Self::Any => "any".to_string(),
        }
    }
}

/// A single named, typed field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name as it appears in the input document.
    pub name: String,
    /// Declared type.
    pub ty: FieldType,
    /// Whether the field must be present in the input document.
    pub required: bool,
    /// Default value materialized when an optional field is absent.
    pub default: Option<Value>,
}

/// Policy for input fields the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFields {
    /// Undeclared fields are a validation error.
    Forbid,
    /// Undeclared fields pass through to the validated document untouched.
    Allow,
}

/// A discriminated conditional: an enum field whose value selects which of
/// several optional sub-blocks must be present.
///
/// The governed blocks are siblings of the discriminator by default. When a
/// [`within`](Self::within) container is set, they are instead fields of
/// that sibling object — the layout run-coordinator-style charts use, where
/// `type` selects a block inside a `config` object.
///
/// The mapping is ordered; variants without an entry simply require no
/// sub-block. Whatever the discriminator resolves to, every *other* mapped
/// sub-block must be absent or left at its default.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalGroup {
    discriminator: String,
    container: Option<String>,
    mapping: Vec<(String, String)>,
}

impl ConditionalGroup {
    /// Create a group keyed on the named discriminator field.
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            container: None,
            mapping: Vec::new(),
        }
    }

    /// Resolve governed blocks inside the named sibling object instead of
    /// directly among the discriminator's siblings.
    pub fn within(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Map a discriminator variant to the sub-block it activates.
    pub fn map(mut self, variant: impl Into<String>, block: impl Into<String>) -> Self {
        self.mapping.push((variant.into(), block.into()));
        self
    }

    /// The discriminator field name.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// The container object holding the governed blocks, if any.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// The variant → sub-block mapping, in declaration order.
    pub fn mapping(&self) -> &[(String, String)] {
        &self.mapping
    }

    /// The sub-block activated by the given variant, if any.
    pub fn block_for(&self, variant: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(v, _)| v == variant)
            .map(|(_, b)| b.as_str())
    }

    /// All governed sub-block names, in declaration order.
    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.mapping.iter().map(|(_, b)| b.as_str())
    }
}

/// Schema for an object node: ordered field declarations, an extra-fields
/// policy, and zero or more conditional groups.
///
/// Immutable after construction; safely shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<FieldDef>,
    extra: ExtraFields,
    groups: Vec<ConditionalGroup>,
}

impl ObjectSchema {
    /// Start building an object schema with the given name.
    ///
    /// The name appears in construction errors and in the exported JSON
    /// Schema's `title`; it is not matched against the input document.
    pub fn builder(name: impl Into<String>) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            extra: ExtraFields::Forbid,
            groups: Vec::new(),
        }
    }

    /// The schema's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All field declarations, in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The extra-fields policy for this object.
    pub fn extra_fields(&self) -> ExtraFields {
        self.extra
    }

    /// All conditional groups declared on this object.
    pub fn groups(&self) -> &[ConditionalGroup] {
        &self.groups
    }
}

/// Builder for [`ObjectSchema`]. Extra fields are forbidden unless
/// [`allow_extra_fields`](Self::allow_extra_fields) is called.
#[derive(Debug)]
pub struct ObjectSchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
    extra: ExtraFields,
    groups: Vec<ConditionalGroup>,
}

impl ObjectSchemaBuilder {
    /// Declare a required field.
    pub fn required(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            required: true,
            default: None,
        });
        self
    }

    /// Declare an optional field with no default.
    pub fn optional(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            required: false,
            default: None,
        });
        self
    }

    /// Declare an optional field whose default is materialized into the
    /// validated document when the input omits it.
    pub fn optional_with_default(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        default: Value,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            required: false,
            default: Some(default),
        });
        self
    }

    /// Let undeclared input fields pass through instead of rejecting them.
    pub fn allow_extra_fields(mut self) -> Self {
        self.extra = ExtraFields::Allow;
        self
    }

    /// Attach a conditional group. Its references are checked at
    /// [`build`](Self::build) time.
    pub fn conditional(mut self, group: ConditionalGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Finish, checking structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for duplicate field names, or for any
    /// conditional group whose discriminator is missing or not enum-typed,
    /// whose mapped variants are not declared enum variants, or whose
    /// sub-blocks are missing or required.
    pub fn build(self) -> Result<ObjectSchema, SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    object: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for group in &self.groups {
            let discriminator = self
                .fields
                .iter()
                .find(|f| f.name == group.discriminator())
                .ok_or_else(|| SchemaError::UnknownDiscriminator {
                    object: self.name.clone(),
                    discriminator: group.discriminator().to_string(),
                })?;

            let variants = match &discriminator.ty {
                FieldType::Enum(variants) => variants,
                _ => {
                    return Err(SchemaError::DiscriminatorNotEnum {
                        object: self.name.clone(),
                        discriminator: group.discriminator().to_string(),
                    })
                }
            };

            // Governed blocks live either among the discriminator's
            // siblings or inside the named container object.
            let block_fields: &[FieldDef] = match group.container() {
                None => &self.fields,
                Some(container) => {
                    let container_def = self
                        .fields
                        .iter()
                        .find(|f| f.name == container)
                        .ok_or_else(|| SchemaError::UnknownContainer {
                            object: self.name.clone(),
                            container: container.to_string(),
                        })?;
                    match &container_def.ty {
                        FieldType::Object(inner) => inner.fields(),
                        _ => {
                            return Err(SchemaError::ContainerNotObject {
                                object: self.name.clone(),
                                container: container.to_string(),
                            })
                        }
                    }
                }
            };

            for (variant, block) in group.mapping() {
                if !variants.contains(variant) {
                    return Err(SchemaError::UnknownVariant {
                        object: self.name.clone(),
                        discriminator: group.discriminator().to_string(),
                        variant: variant.clone(),
                    });
                }
                let block_def = block_fields.iter().find(|f| &f.name == block).ok_or_else(
                    || SchemaError::UnknownBlock {
                        object: self.name.clone(),
                        variant: variant.clone(),
                        block: block.clone(),
                    },
                )?;
                if block_def.required {
                    return Err(SchemaError::BlockNotOptional {
                        object: self.name.clone(),
                        block: block.clone(),
                    });
                }
            }
        }

        Ok(ObjectSchema {
            name: self.name,
            fields: self.fields,
            extra: self.extra,
            groups: self.groups,
        })
    }
}

/// Convenience constructor for enum field types.
pub fn enum_of<I, S>(variants: I) -> FieldType
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FieldType::Enum(variants.into_iter().map(Into::into).collect())
}
