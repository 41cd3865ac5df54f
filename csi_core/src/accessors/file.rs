//! Model file operations.

use std::path::Path;

use crate::engine::{Call, Dispatch, Interface};
use crate::errors::ApiResult;

pub struct FileAccessor<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> FileAccessor<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        FileAccessor { engine }
    }

    /// Replace the model with a blank one, keeping the present units
    pub fn new_blank(&self) -> ApiResult<()> {
        Call::new(Interface::File, "NewBlank").invoke(self.engine)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ApiResult<()> {
        Call::new(Interface::File, "Save")
            .arg(path.display().to_string())
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn open(&self, path: &Path) -> ApiResult<()> {
        Call::new(Interface::File, "OpenFile")
            .arg(path.display().to_string())
            .invoke(self.engine)?;
        Ok(())
    }
}
