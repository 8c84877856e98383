use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    ForgotPassword,
    Info,
    Prediction,
    Profile,
    Chat,
}

const ANONYMOUS_MENU: &[Page] = &[Page::Home, Page::Login, Page::Register, Page::ForgotPassword, Page::Info];
const AUTHENTICATED_MENU: &[Page] = &[Page::Info, Page::Prediction, Page::Profile, Page::Chat];

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::Login,
        Page::Register,
        Page::ForgotPassword,
        Page::Info,
        Page::Prediction,
        Page::Profile,
        Page::Chat,
    ];

    /// Parses the `page` query value. Unknown keys select nothing.
    pub fn from_key(key: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Login => "login",
            Page::Register => "register",
            Page::ForgotPassword => "forgot_password",
            Page::Info => "info",
            Page::Prediction => "prediction",
            Page::Profile => "profile",
            Page::Chat => "chat",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::ForgotPassword => "Forgot Password",
            Page::Info => "Autism Info",
            Page::Prediction => "ASD Prediction",
            Page::Profile => "Profile",
            Page::Chat => "Chat",
        }
    }

    pub fn href(&self) -> String {
        format!("/?page={}", self.key())
    }
}

impl SessionState {
    /// Pages offered in the navigation menu, in menu order.
    pub fn menu(&self) -> &'static [Page] {
        match self {
            SessionState::Anonymous => ANONYMOUS_MENU,
            SessionState::Authenticated(_) => AUTHENTICATED_MENU,
        }
    }

    pub fn can_view(&self, page: Page) -> bool {
        self.menu().contains(&page)
    }

    pub fn default_page(&self) -> Page {
        match self {
            SessionState::Anonymous => Page::Home,
            SessionState::Authenticated(_) => Page::Info,
        }
    }

    /// The page to render for a menu selection; unreachable selections fall
    /// back to the default page.
    pub fn resolve(&self, requested: Option<Page>) -> Page {
        match requested {
            Some(page) if self.can_view(page) => page,
            _ => self.default_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::Role, session::Identity};

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Identity {
            id: 1,
            username: "amy".to_owned(),
            role,
        })
    }

    #[test]
    fn anonymous_sees_only_public_pages() {
        let state = SessionState::Anonymous;
        for page in [Page::Home, Page::Login, Page::Register, Page::ForgotPassword, Page::Info] {
            assert!(state.can_view(page), "{page:?}");
        }
        for page in [Page::Prediction, Page::Profile, Page::Chat] {
            assert!(!state.can_view(page), "{page:?}");
            assert_eq!(state.resolve(Some(page)), Page::Home);
        }
        assert_eq!(state.resolve(None), Page::Home);
    }

    #[test]
    fn authenticated_sees_member_pages() {
        for state in [signed_in(Role::User), signed_in(Role::Doctor)] {
            assert_eq!(state.resolve(None), Page::Info);
            assert_eq!(state.resolve(Some(Page::Chat)), Page::Chat);
            assert_eq!(state.resolve(Some(Page::Login)), Page::Info);
            assert_eq!(state.resolve(Some(Page::Register)), Page::Info);
        }
    }

    #[test]
    fn only_doctors_reply() {
        assert!(!SessionState::Anonymous.is_doctor());
        assert!(!signed_in(Role::User).is_doctor());
        assert!(signed_in(Role::Doctor).is_doctor());
    }

    #[test]
    fn page_keys_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_key(page.key()), Some(page));
        }
        assert_eq!(Page::from_key("admin"), None);
        assert_eq!(Page::from_key(""), None);
    }

    #[test]
    fn every_page_is_in_some_menu() {
        for page in Page::ALL {
            assert!(ANONYMOUS_MENU.contains(&page) || AUTHENTICATED_MENU.contains(&page));
        }
    }
}
