//! # Error Types — Schema Construction Errors
//!
//! Errors raised while *building* a schema description. These indicate a
//! programming error in a schema definition (duplicate fields, a conditional
//! group pointing at a field that does not exist) and are surfaced at build
//! time so the validator never has to second-guess a schema at runtime.
//!
//! Validation failures against a *document* are not errors in this sense;
//! they are reported as [`crate::Violations`] data.

use thiserror::Error;

/// Error constructing an [`crate::ObjectSchema`].
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two fields with the same name were declared on one object.
    #[error("duplicate field '{field}' in object '{object}'")]
    DuplicateField {
        /// Name of the object schema being built.
        object: String,
        /// The duplicated field name.
        field: String,
    },

    /// A conditional group references a discriminator field that is not
    /// declared on the object.
    #[error("object '{object}': conditional group references unknown discriminator '{discriminator}'")]
    UnknownDiscriminator {
        /// Name of the object schema being built.
        object: String,
        /// The missing discriminator field name.
        discriminator: String,
    },

    /// The referenced discriminator field is not enum-typed.
    #[error("object '{object}': discriminator '{discriminator}' is not an enum field")]
    DiscriminatorNotEnum {
        /// Name of the object schema being built.
        object: String,
        /// The mis-typed discriminator field name.
        discriminator: String,
    },

    /// A conditional group maps a value that is not a declared variant of
    /// the discriminator's enum.
    #[error("object '{object}': conditional group maps '{variant}', which is not a variant of discriminator '{discriminator}'")]
    UnknownVariant {
        /// Name of the object schema being built.
        object: String,
        /// The discriminator field name.
        discriminator: String,
        /// The unmapped variant value.
        variant: String,
    },

    /// A conditional group names a container field that is not declared on
    /// the object.
    #[error("object '{object}': conditional group references unknown container '{container}'")]
    UnknownContainer {
        /// Name of the object schema being built.
        object: String,
        /// The missing container field name.
        container: String,
    },

    /// The referenced container field is not object-typed.
    #[error("object '{object}': conditional group container '{container}' is not an object field")]
    ContainerNotObject {
        /// Name of the object schema being built.
        object: String,
        /// The mis-typed container field name.
        container: String,
    },

    /// A conditional group maps a variant to a sub-block field that is not
    /// declared on the object.
    #[error("object '{object}': conditional group maps variant '{variant}' to unknown sub-block '{block}'")]
    UnknownBlock {
        /// Name of the object schema being built.
        object: String,
        /// The variant whose mapping is broken.
        variant: String,
        /// The missing sub-block field name.
        block: String,
    },

    /// A conditional group maps a variant to a required field. Governed
    /// sub-blocks must be optional; their presence is decided by the
    /// discriminator, not by the schema's required list.
    #[error("object '{object}': sub-block '{block}' is governed by a conditional group and must be optional")]
    BlockNotOptional {
        /// Name of the object schema being built.
        object: String,
        /// The required sub-block field name.
        block: String,
    },
}
