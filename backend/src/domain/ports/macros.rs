//! Helper macro for generating port error enums.
//!
//! Every port declares its failures as a small `thiserror` enum; this macro
//! removes the constructor boilerplate. Variants either carry a `message`
//! string or are bare markers.

macro_rules! port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $field:ident } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $( { $field: String } )?,
            )*
        }

        impl $name {
            $(
                port_error!(@ctor $variant $( $field )?);
            )*
        }
    };

    (@ctor $variant:ident $field:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($field: impl Into<String>) -> Self {
                Self::$variant { $field: $field.into() }
            }
        }
    };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };
}

pub(crate) use port_error;

#[cfg(test)]
mod tests {
    port_error! {
        /// Example enum exercising both variant shapes.
        pub enum ExampleError {
            Broken { message } => "broken: {message}",
            Missing => "missing",
        }
    }

    #[test]
    fn message_variants_format_their_payload() {
        assert_eq!(
            ExampleError::broken("disk on fire").to_string(),
            "broken: disk on fire"
        );
    }

    #[test]
    fn bare_variants_use_the_static_display() {
        assert_eq!(ExampleError::missing().to_string(), "missing");
    }
}
