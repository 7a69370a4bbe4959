/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// Tool messages need a call id and are built with [`Message::tool`](crate::Message::tool)
/// instead.
///
/// ```rust
/// use parley::{Role, parley_msg};
///
/// let message = parley_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! parley_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use parley::{Role, parley_messages};
///
/// let messages = parley_messages![
///     system => "You are concise.",
///     user => "What is the weather in Lisbon?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! parley_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::parley_msg!($role => $content)),+]
    };
}

/// Creates a [`Conversation`](crate::Conversation) with a seeded transcript.
///
/// ```rust
/// use parley::parley_conversation;
///
/// let conversation = parley_conversation!("conv-7", user => "Plan a trip to Porto");
/// assert_eq!(conversation.first_user_text(), Some("Plan a trip to Porto"));
/// ```
#[macro_export]
macro_rules! parley_conversation {
    ($conversation_id:expr $(,)?) => {
        $crate::Conversation::new($conversation_id)
    };
    ($conversation_id:expr, $($role:ident => $content:expr),+ $(,)?) => {{
        let mut conversation = $crate::Conversation::new($conversation_id);
        $(conversation.push($crate::parley_msg!($role => $content));)+
        conversation
    }};
}
