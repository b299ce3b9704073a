//! Export straight from a loaded session.

use iecdoc_data::Session;
use iecdoc_render::TranscriptLayout;

use crate::artifact::ExportArtifact;
use crate::control::ExportControl;
use crate::driver::{ExportDriver, ExportState};
use crate::error::{ExportError, Result};

/// Lay out the session's dataset and export it
pub fn export_session(
    session: &Session,
    layout: &TranscriptLayout,
    driver: &ExportDriver,
) -> Result<ExportArtifact> {
    export_session_with(
        session,
        layout,
        driver,
        &ExportControl::default(),
        &mut |_: &ExportState| {},
    )
}

/// [`export_session`] with export controls and progress reporting
pub fn export_session_with(
    session: &Session,
    layout: &TranscriptLayout,
    driver: &ExportDriver,
    control: &ExportControl,
    observer: &mut dyn FnMut(&ExportState),
) -> Result<ExportArtifact> {
    let dataset = session.dataset().ok_or(ExportError::NoDataset)?;
    let pages = layout.pages(dataset);
    log::debug!(
        "Exporting {} students as {} pages",
        dataset.len(),
        pages.len()
    );
    driver.export_all_with(&pages, control, observer)
}
