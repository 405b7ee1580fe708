//! Run-time side of a dispatch stub

use std::path::Path;

use suite_context::Context;
use suite_fs::{SuiteLayout, resolve_real, validate_path_identifier};

use crate::alias::{Alias, InvokeOptions};
use crate::stub::StubRecord;
use crate::{Error, Result};

/// Run the tool behind `stub` with the arguments the stub received.
///
/// The suite root is found from the stub's real location, so a suite keeps
/// working after being moved or linked into `PATH`. Errors cover locating and
/// loading the context; once the tool runs, its exit code is returned.
pub fn dispatch<C: Context, S: AsRef<str>>(
    stub: &Path,
    args: &[S],
    options: InvokeOptions,
) -> Result<i32> {
    let stub = resolve_real(stub)?;
    let record = StubRecord::read(&stub)?;
    let invalid = |message: String| Error::InvalidStub {
        path: stub.clone(),
        message,
    };

    validate_path_identifier(&record.context_name).map_err(|e| invalid(e.to_string()))?;
    let layout = SuiteLayout::from_stub(&stub)
        .ok_or_else(|| invalid("stub is not inside a suite bin directory".to_string()))?;

    let context_path = layout.context_path(&record.context_name, C::EXTENSION);
    tracing::debug!(
        stub = %stub.display(),
        context = %context_path.display(),
        tool = %record.tool_name,
        "Dispatching"
    );
    let context = C::load(&context_path)?;

    Ok(Alias::new(&record.context_name, &context, &record.tool_name)
        .with_options(options)
        .with_hidden_path(layout.bin_dir())
        .run(args))
}
