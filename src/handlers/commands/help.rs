//! Help command handler

/// Usage text for the command line
pub fn help_text() -> String {
    "EventHub\n\n\
        events [all|upcoming|present|past] [query]  - Browse events\n\
        event <id>                                  - Show event details\n\
        login <email> <password> <user|organizer>   - Sign in\n\
        signup <name> <email> <password> <role>     - Create an account\n\
        logout                                      - Sign out\n\
        register <event-id>                         - Register for an event\n\
        create <title> <YYYY-MM-DD> <HH:MM> <location> <capacity|-> <description> [image-url]\n\
        \x20                                           - Create an event (organizers)\n\
        dashboard                                   - Your registrations or your events\n\
        help                                        - Show this help message"
        .to_string()
}
