// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the rb crates.

/// `Display` for a fieldless enum, one string per variant.
///
/// ```ignore
/// crate::simple_display! {
///     ArgumentKind {
///         Str => "str",
///         Int => "int",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $text:literal ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = match self {
                    $( Self::$variant => $text, )+
                };
                f.write_str(text)
            }
        }
    };
}

/// Fixture builder for a record type, compiled only for tests and the
/// `test-support` feature.
///
/// `into` fields take `impl Into<T>`, `set` fields take `T`, and `option`
/// fields are `None` until set. Every field of the target must be listed.
///
/// ```ignore
/// crate::builder! {
///     pub struct JobBuilder => Job {
///         into { id: JobId = "nightly-import" }
///         set { is_active: bool = true }
///         option { description: String = None }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? }
            set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? }
            option { $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)? }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $into_field: $into_ty, )*
            $( $set_field: $set_ty, )*
            $( $opt_field: Option<$opt_ty>, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $into_field: $into_default.into(), )*
                    $( $set_field: $set_default, )*
                    $( $opt_field: $opt_default, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                    self.$into_field = v.into();
                    self
                }
            )*

            $crate::setters! {
                set { $( $set_field: $set_ty ),* }
                option { $( $opt_field: $opt_ty ),* }
            }

            pub fn build(self) -> $target {
                $target {
                    $( $into_field: self.$into_field, )*
                    $( $set_field: self.$set_field, )*
                    $( $opt_field: self.$opt_field, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Chained setters for request structs, expanded inside their `impl` block.
///
/// ```ignore
/// impl EditRun {
///     rb_core::setters! {
///         option { action: String }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(set { $( $set_field:ident : $set_ty:ty ),* $(,)? })?
        $(option { $( $opt_field:ident : $opt_ty:ty ),* $(,)? })?
    ) => {
        $($(
            pub fn $set_field(mut self, v: $set_ty) -> Self {
                self.$set_field = v;
                self
            }
        )*)?

        $($(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*)?
    };
}
