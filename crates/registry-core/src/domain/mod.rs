//! Domain model (artifact types, keys, records, errors).

pub mod artifact_type;
pub mod errors;
pub mod ids;
pub mod metadata;

pub use self::artifact_type::{ArtifactType, InvalidArtifactType};
pub use self::errors::{
    BoxError, EntityKind, ErrorKind, MissingEntity, NotFoundError, RegistryError, StorageFault,
};
pub use self::ids::{ArtifactId, GroupId, Key, KeyMarker, RuleId, VersionId};
pub use self::metadata::{ArtifactVersionMetaData, GroupMetaData, NewGroup, NewVersion, RuleConfig};
