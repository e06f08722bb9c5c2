//! Static field declarations for every domain type.
//!
//! # Design
//! The mapper never inspects a Rust type at runtime. Instead each domain type
//! has a `TypeDescriptor` listing the JSON keys it cares about and what kind
//! of value each key holds. A nested field names its target by `ModelType`,
//! which is enough for the mapper to recurse without knowing anything about
//! the concrete structs in `types.rs`.

/// Every domain type the gateway responses can be mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    ApiEnvelope,
    Response,
    Group,
    Item,
    Venue,
    Location,
    Hours,
    Photo,
    PhotoCollection,
    PhotoGroup,
    Tip,
    Like,
}

/// JSON shape a scalar field accepts. Anything else leaves the field unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    /// Integral JSON number that fits in an `i64`.
    Integer,
    Bool,
    /// Array of strings; non-string elements are dropped.
    StringList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// A single nested object of the named type.
    Object(ModelType),
    /// An ordered sequence of objects of the named type.
    Sequence(ModelType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub model: ModelType,
    pub fields: &'static [FieldDecl],
}

impl TypeDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const fn scalar(name: &'static str, kind: ScalarKind) -> FieldDecl {
    FieldDecl {
        name,
        kind: FieldKind::Scalar(kind),
    }
}

const fn object(name: &'static str, model: ModelType) -> FieldDecl {
    FieldDecl {
        name,
        kind: FieldKind::Object(model),
    }
}

const fn sequence(name: &'static str, model: ModelType) -> FieldDecl {
    FieldDecl {
        name,
        kind: FieldKind::Sequence(model),
    }
}

static API_ENVELOPE: TypeDescriptor = TypeDescriptor {
    model: ModelType::ApiEnvelope,
    fields: &[object("response", ModelType::Response)],
};

static RESPONSE: TypeDescriptor = TypeDescriptor {
    model: ModelType::Response,
    fields: &[
        sequence("groups", ModelType::Group),
        object("venue", ModelType::Venue),
    ],
};

static GROUP: TypeDescriptor = TypeDescriptor {
    model: ModelType::Group,
    fields: &[
        scalar("type", ScalarKind::String),
        scalar("name", ScalarKind::String),
        sequence("items", ModelType::Item),
    ],
};

static ITEM: TypeDescriptor = TypeDescriptor {
    model: ModelType::Item,
    fields: &[
        object("venue", ModelType::Venue),
        sequence("tips", ModelType::Tip),
    ],
};

static VENUE: TypeDescriptor = TypeDescriptor {
    model: ModelType::Venue,
    fields: &[
        scalar("id", ScalarKind::String),
        scalar("name", ScalarKind::String),
        object("location", ModelType::Location),
        object("hours", ModelType::Hours),
        scalar("url", ScalarKind::String),
        object("photos", ModelType::PhotoCollection),
    ],
};

static LOCATION: TypeDescriptor = TypeDescriptor {
    model: ModelType::Location,
    fields: &[scalar("formattedAddress", ScalarKind::StringList)],
};

static HOURS: TypeDescriptor = TypeDescriptor {
    model: ModelType::Hours,
    fields: &[
        scalar("status", ScalarKind::String),
        scalar("isOpen", ScalarKind::Bool),
    ],
};

static PHOTO: TypeDescriptor = TypeDescriptor {
    model: ModelType::Photo,
    fields: &[
        scalar("prefix", ScalarKind::String),
        scalar("suffix", ScalarKind::String),
        scalar("visibility", ScalarKind::String),
    ],
};

static PHOTO_COLLECTION: TypeDescriptor = TypeDescriptor {
    model: ModelType::PhotoCollection,
    fields: &[sequence("groups", ModelType::PhotoGroup)],
};

static PHOTO_GROUP: TypeDescriptor = TypeDescriptor {
    model: ModelType::PhotoGroup,
    fields: &[
        scalar("name", ScalarKind::String),
        sequence("items", ModelType::Photo),
    ],
};

static TIP: TypeDescriptor = TypeDescriptor {
    model: ModelType::Tip,
    fields: &[
        object("likes", ModelType::Like),
        object("photo", ModelType::Photo),
    ],
};

static LIKE: TypeDescriptor = TypeDescriptor {
    model: ModelType::Like,
    fields: &[scalar("count", ScalarKind::Integer)],
};

impl ModelType {
    /// The static field table for this type.
    pub fn descriptor(self) -> &'static TypeDescriptor {
        match self {
            ModelType::ApiEnvelope => &API_ENVELOPE,
            ModelType::Response => &RESPONSE,
            ModelType::Group => &GROUP,
            ModelType::Item => &ITEM,
            ModelType::Venue => &VENUE,
            ModelType::Location => &LOCATION,
            ModelType::Hours => &HOURS,
            ModelType::Photo => &PHOTO,
            ModelType::PhotoCollection => &PHOTO_COLLECTION,
            ModelType::PhotoGroup => &PHOTO_GROUP,
            ModelType::Tip => &TIP,
            ModelType::Like => &LIKE,
        }
    }
}
