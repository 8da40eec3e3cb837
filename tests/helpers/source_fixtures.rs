//! Common source fixtures for tests.

// Bundled definitions
pub const CORE_PLATFORM: &str = r#"
abstract platform CorePlatform {
    provider Clock {
        event Tick(time)
    }
}
"#;

pub const CORE_LIBRARY: &str = r#"
library CoreLibrary {
    intent Help { inputs { "help", "what can you do" } }
    intent Fallback
}
"#;

// Workspace platforms
pub const SLACK_PLATFORM: &str = r#"
import platform "CorePlatform"

platform Slack extends CorePlatform {
    provider MessageReceived {
        event Message(text, channel)
    }
    provider Reactions {
        event Reaction(emoji)
    }
}
"#;

pub const CALENDAR_PLATFORM: &str = r#"
platform Calendar {
    provider Agenda {
        event Meeting(title)
    }
}
"#;

pub const CALENDAR_PLATFORM_EDITED: &str = r#"
platform Calendar {
    provider Agenda {
        event Meeting(title)
        event Cancelled(title)
    }
}
"#;

pub const GREETINGS_LIBRARY: &str = r#"
library Greetings {
    intent Hello { inputs { "hi", "hello" } }
    intent HowAreYou follows Hello
    intent Bye follows Greetings.HowAreYou
    event Timeout
}
"#;

// Execution models
pub const CHAT_BOT: &str = r#"
import platform "Slack.platform" as chat
import library "Greetings.intent"
import library "CoreLibrary"

use provider chat.MessageReceived

state Init
state Talking
state Done

on Hello {
    -> Talking when Message.channel == "general"
}
on Bye {
    -> Done
}
on Help {
    -> Init
}
"#;

pub const CALENDAR_BOT: &str = r#"
import platform "Calendar.platform"

use provider Calendar.Agenda

state Idle

on Meeting {
    -> Idle when Meeting.title != ""
}
"#;
