//! Domain model (ids, article, image, validation, errors).

pub mod article;
pub mod errors;
pub mod ids;
pub mod image;
pub mod validation;

pub use article::{Article, ArticleFilters, ArticleInput};
pub use errors::{ErrorKind, StoreError};
pub use ids::{ArticleId, IdParseError};
pub use image::{ImageInput, ImageUpload, MAX_IMAGE_BYTES};
pub use validation::{Field, FieldError, ValidationErrors, validate};
