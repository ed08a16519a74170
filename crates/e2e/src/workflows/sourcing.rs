use tracing::info;

use crate::data::{ItemData, SupplierData};
use crate::error::E2eResult;
use crate::pages::SourcingPage;
use crate::session::Driver;

pub struct SourcingWorkflow<'a, D: Driver + ?Sized> {
    page: SourcingPage<'a, D>,
}

impl<'a, D: Driver + ?Sized> SourcingWorkflow<'a, D> {
    pub fn new(driver: &'a D, base_url: &'a str) -> Self {
        Self {
            page: SourcingPage::new(driver, base_url),
        }
    }

    /// Create a sourcing record for `supplier` with `item` as its first row
    pub async fn create_supplier_with_item(&self, supplier: &SupplierData, item: &ItemData) -> E2eResult<()> {
        info!("Creating sourcing record for {} / {}", supplier.supplier_name, item.name);

        self.page.open_sourcing_page().await?;
        self.page.click_new_source_button().await?;

        self.page.fill_supplier_name(&supplier.supplier_name).await?;
        self.page.fill_supplier_address(&supplier.supplier_address).await?;
        self.page.fill_contact_person(&supplier.contact_person).await?;
        self.page.fill_contact_address(&supplier.contact_address).await?;
        self.page.fill_contact_number(&supplier.contact_number).await?;
        self.page.fill_email(&supplier.email).await?;

        self.page.click_add_item_button().await?;
        self.page.fill_item_name(&item.name, 1).await?;
        self.page.fill_item_description(&item.description, 1).await?;
        self.page.select_brand_option(&item.brand, 1).await?;
        self.page.select_department_option(&item.department, 1).await?;
        self.page.select_category_option(&item.category, 1).await?;
        self.page.fill_selling_price(&item.selling_price, 1).await?;

        self.page.click_save_item_button().await
    }
}
