use tracing::info;

use crate::error::E2eResult;
use crate::pages::SourcingPage;
use crate::session::Driver;

pub struct ApprovalWorkflow<'a, D: Driver + ?Sized> {
    page: SourcingPage<'a, D>,
}

impl<'a, D: Driver + ?Sized> ApprovalWorkflow<'a, D> {
    pub fn new(driver: &'a D, base_url: &'a str) -> Self {
        Self {
            page: SourcingPage::new(driver, base_url),
        }
    }

    /// Approve the record currently on screen
    pub async fn approve(&self) -> E2eResult<()> {
        self.page.click_approve_button().await?;
        self.page.confirm_approve().await
    }

    /// Reject the record currently on screen
    pub async fn reject(&self, reason: &str) -> E2eResult<()> {
        self.page.click_reject_button().await?;
        self.page.fill_rejection_reason(reason).await?;
        self.page.confirm_reject().await
    }

    /// Find `supplier_name` in the sourcing list and approve it
    pub async fn approve_supplier(&self, supplier_name: &str) -> E2eResult<()> {
        info!("Approving sourcing record for {}", supplier_name);
        self.page.open_sourcing_page().await?;
        self.page.open_record(supplier_name).await?;
        self.approve().await
    }
}
