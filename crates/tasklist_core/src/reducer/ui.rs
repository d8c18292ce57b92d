use super::{IgnoredReason, Transition};
use crate::action::Action;
use crate::model::ui::UiFlags;

/// Applies a UI-slice action. Task actions are `Unchanged`.
pub fn reduce_ui(flags: &mut UiFlags, action: &Action) -> Transition {
    match action {
        Action::ToggleDarkMode => {
            flags.dark_mode = !flags.dark_mode;
            Transition::Applied
        }
        // No action ever sets this back to `true`.
        Action::DismissInfoBanner => set_flag(&mut flags.show_info_banner, false),
        Action::ShowAddedBanner => set_flag(&mut flags.show_added_banner, true),
        Action::HideAddedBanner => set_flag(&mut flags.show_added_banner, false),
        _ => Transition::Ignored(IgnoredReason::Unchanged),
    }
}

fn set_flag(flag: &mut bool, value: bool) -> Transition {
    if *flag == value {
        return Transition::Ignored(IgnoredReason::Unchanged);
    }
    *flag = value;
    Transition::Applied
}

#[cfg(test)]
mod tests {
    use super::reduce_ui;
    use crate::action::Action;
    use crate::model::ui::UiFlags;
    use crate::reducer::{IgnoredReason, Transition};

    #[test]
    fn dismiss_is_one_way() {
        let mut flags = UiFlags::default();
        assert_eq!(reduce_ui(&mut flags, &Action::DismissInfoBanner), Transition::Applied);
        assert_eq!(
            reduce_ui(&mut flags, &Action::DismissInfoBanner),
            Transition::Ignored(IgnoredReason::Unchanged)
        );
        assert!(!flags.show_info_banner);
    }

    #[test]
    fn show_and_hide_added_banner() {
        let mut flags = UiFlags::default();
        reduce_ui(&mut flags, &Action::ShowAddedBanner);
        assert!(flags.show_added_banner);
        reduce_ui(&mut flags, &Action::HideAddedBanner);
        assert!(!flags.show_added_banner);
    }

    #[test]
    fn task_actions_do_not_touch_flags() {
        let mut flags = UiFlags::default();
        assert_eq!(
            reduce_ui(&mut flags, &Action::ClearAll),
            Transition::Ignored(IgnoredReason::Unchanged)
        );
        assert_eq!(flags, UiFlags::default());
    }
}
