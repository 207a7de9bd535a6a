/// Data layer: reference rows, option lists and filtering.
///
/// Architecture:
/// ```text
///  published sheet / CSV URL / JSON API / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch primary + directory in parallel, sample fallback
///   └──────────┘
///        │  tabular::parse → normalize (header aliases)
///        ▼
///   ┌───────────────┐
///   │ ReferenceData │  Arc<[CurriculumRow]>, Directory
///   └───────────────┘
///        │
///        ├──────────────► options   districts → schools → grades cascade
///        ▼
///   ┌──────────┐
///   │  filter   │  text + date-interval predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///      export   visible rows → CSV
/// ```

pub mod dates;
pub mod export;
pub mod filter;
pub mod grades;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod options;
pub mod sample;
pub mod tabular;
