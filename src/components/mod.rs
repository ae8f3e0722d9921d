//! UI Components
//!
//! Pages and reusable Leptos components.

mod board_column;
mod board_detail_page;
mod board_list_page;
mod code_form;
mod delete_confirm_button;
mod entry_form;
mod github_callback_page;
mod invite_member_form;
mod member_list;
mod navigation;
mod notification_bell;
mod sign_in_page;
mod sign_up_page;
mod task_card;
mod toaster;

pub use board_column::BoardColumn;
pub use board_detail_page::BoardDetailPage;
pub use board_list_page::BoardListPage;
pub use code_form::CodeForm;
pub use delete_confirm_button::DeleteConfirmButton;
pub use entry_form::EntryForm;
pub use github_callback_page::GitHubCallbackPage;
pub use invite_member_form::InviteMemberForm;
pub use member_list::MemberList;
pub use navigation::Navigation;
pub use notification_bell::NotificationBell;
pub use sign_in_page::SignInPage;
pub use sign_up_page::SignUpPage;
pub use task_card::TaskCard;
pub use toaster::Toaster;
