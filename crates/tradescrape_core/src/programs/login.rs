use tradescrape_logging::scrape_debug;

use crate::event::Attributes;
use crate::phrases::{
    LOGIN_FAILURE, LOGIN_ICON, LOGIN_SUCCESS, LOGOUT_ICON, NOTICE_CLASS, NOTICE_HEADING,
};
use crate::program::Program;
use crate::programs::TagCursor;
use crate::record::LoginStatus;
use crate::text::contains_any;

/// Mobile-site login response: a failure phrase in a `font` element or a
/// logout link decides the outcome.
#[derive(Debug, Clone, Default)]
pub struct LoginMobileProgram {
    cursor: TagCursor,
    status: Option<LoginStatus>,
}

impl LoginMobileProgram {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Program for LoginMobileProgram {
    type Output = LoginStatus;

    fn on_start_tag(&mut self, name: &str, _attrs: &Attributes) {
        self.cursor.on_start(name);
    }

    fn on_end_tag(&mut self, _name: &str) {
        self.cursor.on_end();
    }

    fn on_text(&mut self, text: &str) {
        let logged_in = if self.cursor.is_inside("font") && contains_any(text, LOGIN_FAILURE) {
            false
        } else if self.cursor.is_inside("a") && contains_any(text, LOGIN_SUCCESS) {
            true
        } else {
            return;
        };
        scrape_debug!("mobile login page resolved, logged_in={logged_in}");
        self.status = Some(LoginStatus {
            success: true,
            logged_in,
            notice_present: false,
        });
    }

    fn is_terminal(&self) -> bool {
        self.status.is_some()
    }

    fn finish(self) -> LoginStatus {
        self.status.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Icon {
    #[default]
    Searching,
    Logout,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NoticeStep {
    #[default]
    Idle,
    InTitleDiv,
    InBold,
}

/// PC-site login response: decided by the logout/login button image, then
/// scanned for an "important notice" banner.
#[derive(Debug, Clone, Default)]
pub struct LoginPcProgram {
    icon: Icon,
    notice: NoticeStep,
    notice_present: bool,
}

impl LoginPcProgram {
    pub fn new() -> Self {
        Self::default()
    }

    fn classify_icon(attrs: &Attributes) -> Icon {
        if let Some(alt) = attrs.get("alt") {
            if alt == LOGOUT_ICON {
                return Icon::Logout;
            }
            if alt.contains(LOGIN_ICON) {
                return Icon::Login;
            }
        } else if let Some(title) = attrs.get("title") {
            if title.contains(LOGOUT_ICON) {
                return Icon::Logout;
            }
            if title.contains(LOGIN_ICON) {
                return Icon::Login;
            }
        }
        Icon::Searching
    }
}

impl Program for LoginPcProgram {
    type Output = LoginStatus;

    fn on_start_tag(&mut self, name: &str, attrs: &Attributes) {
        match self.icon {
            Icon::Searching => {
                if name == "img" {
                    self.icon = Self::classify_icon(attrs);
                }
            }
            Icon::Logout => match name {
                "div" => {
                    if attrs.is("class", NOTICE_CLASS) {
                        self.notice = NoticeStep::InTitleDiv;
                    }
                }
                "b" => {
                    if self.notice == NoticeStep::InTitleDiv {
                        self.notice = NoticeStep::InBold;
                    }
                }
                _ => self.notice = NoticeStep::Idle,
            },
            Icon::Login => {}
        }
    }

    fn on_end_tag(&mut self, _name: &str) {}

    fn on_text(&mut self, text: &str) {
        if self.notice != NoticeStep::InBold || text.trim().is_empty() {
            return;
        }
        self.notice = NoticeStep::Idle;
        if contains_any(text, NOTICE_HEADING) {
            scrape_debug!("PC login page carries an important notice");
            self.notice_present = true;
        }
    }

    fn is_terminal(&self) -> bool {
        self.icon == Icon::Login || self.notice_present
    }

    fn finish(self) -> LoginStatus {
        match self.icon {
            Icon::Logout => LoginStatus {
                success: true,
                logged_in: true,
                notice_present: self.notice_present,
            },
            Icon::Login => LoginStatus {
                success: true,
                logged_in: false,
                notice_present: false,
            },
            Icon::Searching => LoginStatus::default(),
        }
    }
}
