/// Data layer: pasted markup in, sector rows out.
///
/// Architecture:
/// ```text
///  clipboard HTML
///        │
///        ▼
///   ┌──────────┐
///   │  markup   │  lenient HTML → Element tree
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ locator   │  first table whose header row starts with "Setor"
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  headers + ParsedRows (number: locale-robust values)
///   └──────────┘
/// ```

pub mod locator;
pub mod markup;
pub mod model;
pub mod number;
pub mod parser;
