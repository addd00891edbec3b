//! # stayscore-core
//!
//! Request pipeline for the stayscore guest rating skill.
//!
//! This crate provides:
//! - Configuration loading with environment overrides
//! - Per-request localization from YAML bundles
//! - Request and response interceptors, handlers and the global error handler
//! - Visual template directives for devices with a screen
//! - Clients for the secrets store, property API, SMS gateway and topic
//! - Background delivery of staff alerts

pub mod alerts;
pub mod collaborators;
mod config;
mod error;
pub mod localization;
mod skill;
pub mod visuals;

pub use alerts::{AlertDispatcher, AlertWorker, StaffAlert};
pub use config::{
    CONFIG_CANDIDATES, ConfigError, DEFAULT_RATING_TASK_NAME, NotificationsConfig,
    PropertyApiConfig, SecretsConfig, ServerConfig, SkillConfig, SkillSection,
};
pub use error::{CollaboratorError, Result, SkillError};
pub use localization::{LocaleRegistry, Translator};
pub use skill::{
    ErrorHandler, GlobalErrorHandler, HandlerInput, Handlers, LocalizationInterceptor,
    RequestAttributes, RequestInterceptor, RequestLoggingInterceptor, ResponseInterceptor,
    ResponseLoggingInterceptor, Skill, SkillBuilder, UnitInfoInterceptor,
};
pub use visuals::VisualTemplates;
