//! Helper macro for declaring port error enums.
//!
//! Every driven port surfaces failures as message-carrying variants; the
//! macro derives the `thiserror` plumbing and a snake_case constructor per
//! variant so adapters can write `FooError::transport("...")` instead of
//! spelling out struct literals.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    /// Human-readable failure detail.
                    message: String,
                },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    #[doc = concat!("Build the `", stringify!($variant), "` variant.")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
