//! Type inspection capability used by the renderer
//!
//! Instead of enumerating properties at runtime, every renderable value
//! classifies itself into a closed set of [`Shape`]s. Structured values expose
//! their displayable fields through a [`Descriptor`] declared once per type.

use std::fmt;
use std::sync::{Arc, OnceLock};

/* ===================== Type Names ===================== */

/// Display name of a type, possibly parametrized (`List<Person>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub base: String,
    pub args: Vec<TypeName>,
}

impl TypeName {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(base: impl Into<String>, args: Vec<TypeName>) -> Self {
        Self {
            base: base.into(),
            args,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/* ===================== Descriptors ===================== */

/// One displayable field of a structured type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Header override
    pub display_name: Option<String>,
    /// Excluded from tables when set
    pub hidden: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            hidden: false,
        }
    }

    pub fn display_as(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Column header for this field
    pub fn header(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Field layout of a structured type.
///
/// Field positions are the accessors: [`Inspect::field`] is called with the
/// index of a field in `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub type_name: TypeName,
    pub fields: Vec<FieldDescriptor>,
}

impl Descriptor {
    pub fn new(type_name: TypeName, fields: Vec<FieldDescriptor>) -> Self {
        Self { type_name, fields }
    }

    /// Fields shown in tables, with their accessor index
    pub fn visible(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> + '_ {
        self.fields.iter().enumerate().filter(|(_, f)| !f.hidden)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Lazily built, shared descriptor for a host type.
///
/// ```
/// use cauldron::render::{Descriptor, DescriptorCell, FieldDescriptor, TypeName};
///
/// static POINT: DescriptorCell = DescriptorCell::new();
///
/// let descriptor = POINT.get_or_init(|| {
///     Descriptor::new(TypeName::new("Point"), vec![FieldDescriptor::new("x")])
/// });
/// assert_eq!(descriptor.fields.len(), 1);
/// ```
pub struct DescriptorCell(OnceLock<Arc<Descriptor>>);

impl DescriptorCell {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_init(&self, build: impl FnOnce() -> Descriptor) -> Arc<Descriptor> {
        self.0.get_or_init(|| Arc::new(build())).clone()
    }
}

impl Default for DescriptorCell {
    fn default() -> Self {
        Self::new()
    }
}

/* ===================== Shapes ===================== */

/// What a sequence's elements look like to the renderer
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Primitive or string elements
    Scalar,
    /// Elements described by a descriptor
    Structured(Arc<Descriptor>),
    /// Elements that are sequences themselves
    Sequence,
}

/// A homogeneous sequence as seen by the renderer
pub struct SequenceView<'a> {
    /// Display type of the sequence itself
    pub type_name: TypeName,
    /// Display type of its elements
    pub element_type: TypeName,
    pub element: ElementKind,
    pub items: Vec<&'a dyn Inspect>,
}

/// Closed classification of a renderable value
pub enum Shape<'a> {
    Null,
    Scalar,
    Sequence(SequenceView<'a>),
    Structured(Arc<Descriptor>),
    /// Anything without a more specific shape
    Opaque,
}

/* ===================== Traits ===================== */

/// Runtime view of a value for rendering
pub trait Inspect {
    fn shape(&self) -> Shape<'_>;

    /// Default textual representation
    fn string_form(&self) -> String;

    /// Value of the field at `index` of this value's descriptor
    fn field(&self, _index: usize) -> Option<&dyn Inspect> {
        None
    }
}

/// Statically known display type of a host type
pub trait DisplayType {
    fn display_type() -> TypeName;

    fn element_kind() -> ElementKind {
        ElementKind::Scalar
    }
}
