//! Data layer: table model, loading, cleaning, charting and export.
//!
//! Architecture:
//! ```text
//!  .csv / .xlsx upload
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  bytes → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────┐
//!   │ pipeline   edit → clean → project          │  driven by FileOptions
//!   └──────────────────────────────────────────┘
//!        │                       │
//!        ▼                       ▼
//!   ┌──────────┐            ┌──────────┐
//!   │  chart    │            │  export   │  Table → .csv / .xlsx bytes
//!   └──────────┘            └──────────┘
//! ```

pub mod chart;
pub mod clean;
pub mod edit;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod project;
