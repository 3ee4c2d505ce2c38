//! Socket codec properties

use proptest::prelude::*;
use yamba_management::shared::{
    ClientMessage, ClientMethod, DecodeError, ServerMessage, ServerMethod,
};

fn client_method() -> impl Strategy<Value = ClientMethod> {
    prop_oneof![Just(ClientMethod::Subscribe), Just(ClientMethod::Unsubscribe)]
}

fn server_method() -> impl Strategy<Value = ServerMethod> {
    prop_oneof![
        Just(ServerMethod::Ok),
        Just(ServerMethod::Bad),
        Just(ServerMethod::Update)
    ]
}

proptest! {
    #[test]
    fn decode_never_panics(payload in ".*") {
        let _ = ClientMessage::decode(&payload);
        let _ = ServerMessage::decode(&payload);
    }

    #[test]
    fn body_survives_any_content(method in client_method(), body in "(.|\n)*") {
        let message = ClientMessage::new(method, body.clone());
        let decoded = ClientMessage::decode(&message.encode()).unwrap();
        prop_assert_eq!(decoded.method, method);
        prop_assert_eq!(decoded.body, body);
    }

    #[test]
    fn server_frames_start_with_method(method in server_method(), body in "[ -~]*") {
        let encoded = ServerMessage::new(method, body.clone()).encode();
        let (token, rest) = encoded.split_once("\n\n").unwrap();
        prop_assert!(ServerMessage::decode(&encoded).is_ok());
        prop_assert_eq!(rest, body.as_str());
        prop_assert!(["OK", "BAD", "UPDATE"].contains(&token));
    }

    #[test]
    fn payload_without_separator_is_rejected(payload in "[^\n]+") {
        prop_assert_eq!(ClientMessage::decode(&payload), Err(DecodeError::MissingSeparator));
    }

    #[test]
    fn lowercase_methods_are_unknown(body in "[a-z/]*") {
        let payload = format!("subscribe\n\n{body}");
        prop_assert_eq!(
            ClientMessage::decode(&payload),
            Err(DecodeError::UnknownMethod("subscribe".to_string()))
        );
    }
}
