//! # cfn-assert - fluent assertions for CloudFormation templates
//!
//! ## Introduction for developers
//!
//! Read this to understand how `cfn-assert` works internally.
//!
//! ### Templates
//!
//! A synthesized template is loaded into a [template::Template] (from JSON, YAML or a file, see
//! [template::Template::load_file]). YAML short-form intrinsics (`!Ref`, `!GetAtt`, ...) are expanded
//! while loading so both formats look the same to everything downstream.
//!
//! The template answers structural queries: "which resources of type `X` match this pattern",
//! "is there an output named `Y` looking like this". Patterns ([pattern::Pattern]) are literal
//! values with [matcher::Matcher]s mixed in wherever something other than equality is needed.
//!
//! ### Resource matchers
//!
//! A [resource::Resource] is minted by the template, either for an arbitrary type tag
//! ([template::Template::resource]) or for one of the known kinds in [kinds]
//! (`template.s3_bucket()`, `template.iam_role()`, ...).
//!
//! Each setter refines what the resource is expected to look like:
//!
//! | setter | writes to |
//! |--------|-----------|
//! | `with_property` | `Properties.<key>` |
//! | `with_metadata` | `Metadata.<key>` |
//! | `with_root_property` | `<key>` |
//! | `with_partial_key` | filters on the logical id |
//! | `depends_on` | `DependsOn` |
//!
//! Kind specific setters (`with_bucket_name`, `assumable_by_lambda`, ...) are shorthands for these.
//!
//! Terminal operations (`id`, `definition`, `exists`, `count_is`, ...) query the template with
//! everything known so far. Nothing is cached, refining a matcher after an assertion is fine.
//! Failures carry what was searched for and every resource of the same type
//! ([error::DebugContext]), which is usually enough to tell why nothing (or too much) matched.
//!
//! ### Example
//!
//! ```
//! use cfn_assert::template;
//!
//! let template = template!(r#"{
//!     "Resources": {
//!         "HandlerRole": {
//!             "Type": "AWS::IAM::Role",
//!             "Properties": {
//!                 "AssumeRolePolicyDocument": {
//!                     "Statement": [{
//!                         "Action": "sts:AssumeRole",
//!                         "Effect": "Allow",
//!                         "Principal": { "Service": "lambda.amazonaws.com" }
//!                     }]
//!                 }
//!             }
//!         },
//!         "Handler": {
//!             "Type": "AWS::Lambda::Function",
//!             "Properties": {
//!                 "Role": { "Fn::GetAtt": ["HandlerRole", "Arn"] },
//!                 "Runtime": "nodejs18.x"
//!             }
//!         }
//!     }
//! }"#);
//!
//! let role = template.iam_role().assumable_by_lambda();
//! let handler = template
//!     .lambda_function()
//!     .with_role(&role)?
//!     .with_runtime("nodejs");
//!
//! handler.exists()?;
//! assert_eq!(handler.id()?, "Handler");
//! # Ok::<(), cfn_assert::error::AssertionError>(())
//! ```
//!
//! ### Logging
//!
//! Loading, queries and facet writes are instrumented with [tracing]. No subscriber is installed,
//! tests in this crate read their filter from `CFN_ASSERT_LOG`.
//!
pub mod error;
pub mod intrinsic;
pub mod kinds;
pub mod matcher;
pub mod pattern;
pub mod removable;
pub mod resource;
pub mod template;
mod yaml;

#[doc(hidden)]
pub use indexmap;

pub use error::{AssertionError, Failure, LoadError, TemplateMismatch};
pub use pattern::Pattern;
pub use removable::RemovalPolicy;
pub use resource::Resource;
pub use template::{StringMatch, Template};
