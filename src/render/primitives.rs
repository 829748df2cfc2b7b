//! `Inspect` for host scalars, options and vectors

use super::inspect::{DisplayType, ElementKind, Inspect, SequenceView, Shape, TypeName};

macro_rules! scalar {
    ($($ty:ty => $name:expr),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar
                }

                fn string_form(&self) -> String {
                    self.to_string()
                }
            }

            impl DisplayType for $ty {
                fn display_type() -> TypeName {
                    TypeName::new($name)
                }
            }
        )*
    };
}

scalar!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    isize => "isize",
    f32 => "f32",
    f64 => "f64",
    bool => "bool",
    char => "char",
    String => "String",
);

impl Inspect for &str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }

    fn string_form(&self) -> String {
        (*self).to_string()
    }
}

impl DisplayType for &str {
    fn display_type() -> TypeName {
        TypeName::new("str")
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Null,
        }
    }

    fn string_form(&self) -> String {
        match self {
            Some(value) => value.string_form(),
            None => "null".to_string(),
        }
    }

    fn field(&self, index: usize) -> Option<&dyn Inspect> {
        self.as_ref()?.field(index)
    }
}

impl<T: DisplayType> DisplayType for Option<T> {
    fn display_type() -> TypeName {
        T::display_type()
    }

    fn element_kind() -> ElementKind {
        T::element_kind()
    }
}

impl<T: Inspect + DisplayType> Inspect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(SequenceView {
            type_name: Self::display_type(),
            element_type: T::display_type(),
            element: T::element_kind(),
            items: self.iter().map(|item| item as &dyn Inspect).collect(),
        })
    }

    fn string_form(&self) -> String {
        let items: Vec<String> = self.iter().map(|item| item.string_form()).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: DisplayType> DisplayType for Vec<T> {
    fn display_type() -> TypeName {
        TypeName::generic("Vec", vec![T::display_type()])
    }

    fn element_kind() -> ElementKind {
        ElementKind::Sequence
    }
}
