// Dialog-mode entry point
//
// Same decision procedure as the page-mode entry; only the effects
// differ: an access-denied fragment instead of a full page, a script
// directive instead of a success redirect, and an edit-dialog re-render
// instead of a form redirect on reject.

use anyhow::Result;

use crate::record::Record;
use crate::workflow::types::{UpdateContext, UpdateDecision};
use crate::workflow::update::UpdateWorkflow;

impl UpdateWorkflow {
    /// Run one submission in dialog mode regardless of how the context
    /// was constructed.
    pub async fn run_dialog(
        &self,
        ctx: &mut UpdateContext,
        record: &mut Record,
    ) -> Result<UpdateDecision> {
        ctx.dialog_mode = true;
        self.run(ctx, record).await
    }
}
