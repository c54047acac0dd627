// Success/error handling strategies for the process step
//
// An explicit callback pair instead of configurably-named hook dispatch:
// the workflow hands the pair the record and context, the pair answers
// with the navigation effect.

use std::sync::Arc;

use crate::navigation::{ActionStatus, DialogDirective, Navigation, UrlBuilder};
use crate::record::Record;
use crate::workflow::types::UpdateContext;

/// Maps a persisted record to its navigation effect.
pub type SuccessHandler = Arc<dyn Fn(&Record, &UpdateContext) -> Navigation + Send + Sync>;

/// Maps a failed process step to its navigation effect. `fatal` carries
/// the raw store diagnostic for unrecoverable failures; validation
/// rejects pass `None` and leave their annotations on the record.
pub type ErrorHandler = Arc<dyn Fn(&Record, Option<&str>, &UpdateContext) -> Navigation + Send + Sync>;

/// The callback pair the process step reports through.
#[derive(Clone)]
pub struct ProcessHandlers {
    pub on_success: SuccessHandler,
    pub on_error: ErrorHandler,
}

impl ProcessHandlers {
    /// Standard page-mode behaviors: stay in the editor when
    /// save-and-continue was flagged, otherwise report through feedback
    /// URLs; validation rejects re-render the edit form.
    pub fn page_defaults(urls: Arc<UrlBuilder>) -> Self {
        let success_urls = urls.clone();
        let on_success: SuccessHandler = Arc::new(move |_record, ctx| {
            if ctx.signals.save_and_continue {
                Navigation::EditView {
                    url: success_urls.edit_view(
                        &ctx.entity,
                        ctx.selector(),
                        ctx.signals.tab.as_deref(),
                    ),
                    replace_stack_slot: false,
                }
            } else {
                Navigation::Feedback {
                    url: success_urls.feedback(
                        &ctx.entity,
                        ActionStatus::Success,
                        ctx.selector(),
                        None,
                    ),
                    status: ActionStatus::Success,
                }
            }
        });

        let error_urls = urls;
        let on_error: ErrorHandler = Arc::new(move |_record, fatal, ctx| match fatal {
            Some(message) => Navigation::Feedback {
                url: error_urls.feedback(
                    &ctx.entity,
                    ActionStatus::Failed,
                    ctx.selector(),
                    Some(message),
                ),
                status: ActionStatus::Failed,
            },
            // Reject info stays on the record; the edit view re-renders it.
            None => Navigation::EditView {
                url: error_urls.edit_view(&ctx.entity, ctx.selector(), ctx.signals.tab.as_deref()),
                replace_stack_slot: true,
            },
        });

        Self {
            on_success,
            on_error,
        }
    }

    /// Dialog-mode behaviors: script directives instead of redirects. A
    /// successful save reloads the page, or refreshes one attribute when
    /// the context supplies a refresh URL; failures re-render the edit
    /// dialog.
    pub fn dialog_defaults(urls: Arc<UrlBuilder>) -> Self {
        let on_success: SuccessHandler = Arc::new(move |_record, ctx| {
            let directive = match &ctx.attribute_refresh_url {
                Some(refresh_url) => DialogDirective::RefreshAttribute {
                    refresh_url: refresh_url.clone(),
                },
                None => DialogDirective::Reload,
            };
            Navigation::Dialog(directive)
        });

        let error_urls = urls;
        let on_error: ErrorHandler = Arc::new(move |_record, fatal, ctx| {
            Navigation::Dialog(DialogDirective::EditDialog {
                save_url: error_urls.dialog_save(&ctx.entity),
                message: fatal.map(str::to_string),
            })
        });

        Self {
            on_success,
            on_error,
        }
    }
}
