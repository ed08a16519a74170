//! Login page

use flair_common::config::join_url;

use crate::error::E2eResult;
use crate::session::{Driver, Locator};

pub const LOGIN_PATH: &str = "/login";

const EMAIL_INPUT: &str = "input[name='email']";
const PASSWORD_INPUT: &str = "input[name='password']";
const SUBMIT_BUTTON: &str = "button[type='submit']";
const USER_MENU: &str = "[data-testid='user-menu']";
const LOGOUT_ITEM: &str = "//*[@role='menuitem'][normalize-space()='Logout']";

pub struct LoginPage<'a, D: Driver + ?Sized> {
    driver: &'a D,
    base_url: &'a str,
}

impl<'a, D: Driver + ?Sized> LoginPage<'a, D> {
    pub fn new(driver: &'a D, base_url: &'a str) -> Self {
        Self { driver, base_url }
    }

    pub async fn open_login_page(&self) -> E2eResult<()> {
        self.driver.goto(&join_url(self.base_url, LOGIN_PATH)).await?;
        self.driver.wait_for(&Locator::css(EMAIL_INPUT)).await
    }

    /// Submit credentials and wait for the signed-in shell
    pub async fn login(&self, email: &str, password: &str) -> E2eResult<()> {
        self.driver.fill(&Locator::css(EMAIL_INPUT), email).await?;
        self.driver.fill(&Locator::css(PASSWORD_INPUT), password).await?;
        self.driver.click(&Locator::css(SUBMIT_BUTTON)).await?;
        self.driver.wait_for(&Locator::css(USER_MENU)).await
    }

    pub async fn logout(&self) -> E2eResult<()> {
        self.driver.click(&Locator::css(USER_MENU)).await?;
        self.driver.click(&Locator::xpath(LOGOUT_ITEM)).await?;
        self.driver.wait_for(&Locator::css(EMAIL_INPUT)).await
    }
}
