//! Per-screen presentation state.
//!
//! # Responsibility
//! - Hold form fields, field errors, selection and transient messages that
//!   the UI renders.
//! - Call services with a borrowed connection; never cache store handles.

pub mod home;
pub mod login;
pub mod register;
