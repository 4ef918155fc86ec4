//! Pending transplant queue: paginated case listing for the dashboard table.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, DatabaseError};
use crate::models::{PageRequest, TransplantCaseFilter, TransplantCaseSummary};

/// One page of the pending queue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCasesPage {
    pub cases: Vec<TransplantCaseSummary>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Fetch a page of cases, newest first, optionally narrowed to one organ type.
///
/// The page and the total come from two separate statements; a concurrent
/// insert between them can make `total_pages` off by one for that request.
pub fn fetch_pending_cases(
    conn: &Connection,
    organ_type: Option<String>,
    page: PageRequest,
) -> Result<PendingCasesPage, DatabaseError> {
    let filter = TransplantCaseFilter {
        organ_type,
        status: None,
    };

    let cases = db::list_transplant_cases(conn, &filter, &page)?;
    let total = db::count_transplant_cases(conn, &filter)?;

    Ok(PendingCasesPage {
        cases,
        total,
        total_pages: page.total_pages(total),
        current_page: page.page(),
    })
}
