//! Item sourcing page: supplier form, item rows and approval actions
//!
//! Item rows are 1-based, matching the order they appear in the form.

use flair_common::config::join_url;

use crate::error::E2eResult;
use crate::pages::xpath_literal;
use crate::session::{Driver, Locator};

pub const SOURCING_PATH: &str = "/item-sourcing";

const NEW_SOURCE_BUTTON: &str = "//button[contains(normalize-space(), 'New Source')]";
const SUPPLIER_NAME_INPUT: &str = "input[name='supplierName']";
const SUPPLIER_ADDRESS_INPUT: &str = "input[name='supplierAddress']";
const CONTACT_PERSON_INPUT: &str = "input[name='contactPerson']";
const CONTACT_ADDRESS_INPUT: &str = "input[name='contactAddress']";
const CONTACT_NUMBER_INPUT: &str = "input[name='contactNumber']";
const EMAIL_INPUT: &str = "input[name='email']";
const ADD_ITEM_BUTTON: &str = "//button[contains(normalize-space(), 'Add Item')]";
const SAVE_ITEM_BUTTON: &str = "//button[normalize-space()='Save']";
const APPROVE_BUTTON: &str = "//button[normalize-space()='Approve']";
const REJECT_BUTTON: &str = "//button[normalize-space()='Reject']";
const DIALOG_CONFIRM_BUTTON: &str = "//*[@role='dialog']//button[normalize-space()='Confirm']";
const DIALOG_REASON_INPUT: &str = "//*[@role='dialog']//textarea";

pub struct SourcingPage<'a, D: Driver + ?Sized> {
    driver: &'a D,
    base_url: &'a str,
}

impl<'a, D: Driver + ?Sized> SourcingPage<'a, D> {
    pub fn new(driver: &'a D, base_url: &'a str) -> Self {
        Self { driver, base_url }
    }

    pub async fn open_sourcing_page(&self) -> E2eResult<()> {
        self.driver.goto(&join_url(self.base_url, SOURCING_PATH)).await?;
        self.driver.wait_for(&Locator::xpath(NEW_SOURCE_BUTTON)).await
    }

    /// Open the record listed under `supplier_name`
    pub async fn open_record(&self, supplier_name: &str) -> E2eResult<()> {
        let row = format!("//tr[.//td[normalize-space()={}]]", xpath_literal(supplier_name));
        self.driver.click(&Locator::xpath(row)).await
    }

    pub async fn click_new_source_button(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(NEW_SOURCE_BUTTON)).await
    }

    pub async fn fill_supplier_name(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(SUPPLIER_NAME_INPUT), value).await
    }

    pub async fn fill_supplier_address(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(SUPPLIER_ADDRESS_INPUT), value).await
    }

    pub async fn fill_contact_person(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(CONTACT_PERSON_INPUT), value).await
    }

    pub async fn fill_contact_address(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(CONTACT_ADDRESS_INPUT), value).await
    }

    pub async fn fill_contact_number(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(CONTACT_NUMBER_INPUT), value).await
    }

    pub async fn fill_email(&self, value: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(EMAIL_INPUT), value).await
    }

    pub async fn click_add_item_button(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(ADD_ITEM_BUTTON)).await
    }

    pub async fn fill_item_name(&self, value: &str, row: usize) -> E2eResult<()> {
        self.driver.fill(&item_field("input", "itemName", row), value).await
    }

    pub async fn fill_item_description(&self, value: &str, row: usize) -> E2eResult<()> {
        self.driver.fill(&item_field("textarea", "description", row), value).await
    }

    pub async fn select_brand_option(&self, value: &str, row: usize) -> E2eResult<()> {
        self.select_option("brand", value, row).await
    }

    pub async fn select_department_option(&self, value: &str, row: usize) -> E2eResult<()> {
        self.select_option("department", value, row).await
    }

    pub async fn select_category_option(&self, value: &str, row: usize) -> E2eResult<()> {
        self.select_option("category", value, row).await
    }

    pub async fn fill_selling_price(&self, value: &str, row: usize) -> E2eResult<()> {
        self.driver.fill(&item_field("input", "sellingPrice", row), value).await
    }

    pub async fn click_save_item_button(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(SAVE_ITEM_BUTTON)).await
    }

    pub async fn click_approve_button(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(APPROVE_BUTTON)).await
    }

    pub async fn confirm_approve(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(DIALOG_CONFIRM_BUTTON)).await
    }

    pub async fn click_reject_button(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(REJECT_BUTTON)).await
    }

    pub async fn fill_rejection_reason(&self, reason: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::xpath(DIALOG_REASON_INPUT), reason).await
    }

    pub async fn confirm_reject(&self) -> E2eResult<()> {
        self.driver.click(&Locator::xpath(DIALOG_CONFIRM_BUTTON)).await
    }

    // Dropdowns are custom listboxes: open the trigger, then pick the option
    async fn select_option(&self, field: &str, value: &str, row: usize) -> E2eResult<()> {
        self.driver.click(&item_field("*", field, row)).await?;
        let option = format!("//*[@role='option'][normalize-space()={}]", xpath_literal(value));
        self.driver.click(&Locator::xpath(option)).await
    }
}

fn item_field(tag: &str, name: &str, row: usize) -> Locator {
    Locator::xpath(format!("(//{}[@name='{}'])[{}]", tag, name, row))
}
