//! Helper macro for port error enums.
//!
//! Every variant carries named fields and gets a snake_case constructor whose
//! parameters accept anything convertible into the field type.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Construct the `" $variant "` variant."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Errors for a pretend blob port.
        pub enum SamplePortError {
            /// Single text field.
            Rejected { message: String } => "rejected: {message}",
            /// Mixed field types.
            TooLarge { path: String, limit: u64 } => "{path} exceeds {limit} bytes",
        }
    }

    #[test]
    fn constructor_accepts_str() {
        let err = SamplePortError::rejected("bad type");
        assert_eq!(err.to_string(), "rejected: bad type");
    }

    #[test]
    fn constructor_keeps_field_order() {
        let err = SamplePortError::too_large("u1/p1/avatar", 5_u64);
        assert_eq!(
            err,
            SamplePortError::TooLarge {
                path: "u1/p1/avatar".to_owned(),
                limit: 5,
            }
        );
        assert_eq!(err.to_string(), "u1/p1/avatar exceeds 5 bytes");
    }
}
