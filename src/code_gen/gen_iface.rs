use crate::{
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

/// Trait that all sub-generators must adhere to.
///
/// A generator only adds files; it never reads the filesystem, so the file
/// set stays a pure function of the options.
pub trait CodeGenTrait {
    fn name(&self) -> &'static str;

    fn applies(&self, _options: &NormalizedOptions) -> bool {
        true
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult;
}
