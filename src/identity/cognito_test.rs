use super::*;

fn now() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(365)
}

// =============================================================================
// REQUEST SHAPE
// =============================================================================

#[test]
fn password_request_serializes_pascal_case() {
    let request = InitiateAuthRequest {
        auth_flow: "USER_PASSWORD_AUTH",
        client_id: "client-1",
        auth_parameters: AuthParameters { username: Some("qa@fab.example"), password: Some("pw"), refresh_token: None },
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": "client-1",
            "AuthParameters": { "USERNAME": "qa@fab.example", "PASSWORD": "pw" }
        })
    );
}

#[test]
fn refresh_request_omits_credentials() {
    let request = InitiateAuthRequest {
        auth_flow: "REFRESH_TOKEN_AUTH",
        client_id: "client-1",
        auth_parameters: AuthParameters { username: None, password: None, refresh_token: Some("r-1") },
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["AuthParameters"], serde_json::json!({ "REFRESH_TOKEN": "r-1" }));
}

#[test]
fn sign_out_request_carries_access_token() {
    let json = serde_json::to_value(GlobalSignOutRequest { access_token: "a-1" }).unwrap();
    assert_eq!(json, serde_json::json!({ "AccessToken": "a-1" }));
}

// =============================================================================
// SUCCESS PARSING
// =============================================================================

#[test]
fn parse_sign_in_result() {
    let json = serde_json::json!({
        "AuthenticationResult": {
            "AccessToken": "a-1",
            "ExpiresIn": 3600,
            "IdToken": "i-1",
            "RefreshToken": "r-1",
            "TokenType": "Bearer"
        },
        "ChallengeParameters": {}
    })
    .to_string();
    let result = parse_auth_result(&json).unwrap();
    let tokens = into_tokens(result, None, now()).unwrap();
    assert_eq!(tokens.id_token, "i-1");
    assert_eq!(tokens.access_token, "a-1");
    assert_eq!(tokens.refresh_token, "r-1");
    assert_eq!(tokens.expires_at, now() + Duration::hours(1));
}

#[test]
fn refresh_result_keeps_previous_refresh_token() {
    let json = serde_json::json!({
        "AuthenticationResult": { "AccessToken": "a-2", "ExpiresIn": 60, "IdToken": "i-2" }
    })
    .to_string();
    let result = parse_auth_result(&json).unwrap();
    let tokens = into_tokens(result, Some("r-1"), now()).unwrap();
    assert_eq!(tokens.refresh_token, "r-1");
    assert_eq!(tokens.id_token, "i-2");
}

#[test]
fn sign_in_without_refresh_token_is_parse_error() {
    let json = serde_json::json!({
        "AuthenticationResult": { "AccessToken": "a", "ExpiresIn": 60, "IdToken": "i" }
    })
    .to_string();
    let result = parse_auth_result(&json).unwrap();
    assert!(matches!(into_tokens(result, None, now()), Err(IdentityError::Parse(_))));
}

#[test]
fn challenge_response_is_reported() {
    let json = serde_json::json!({
        "ChallengeName": "NEW_PASSWORD_REQUIRED",
        "ChallengeParameters": {},
        "Session": "opaque"
    })
    .to_string();
    let err = parse_auth_result(&json).unwrap_err();
    assert!(matches!(err, IdentityError::Challenge(name) if name == "NEW_PASSWORD_REQUIRED"));
}

#[test]
fn empty_response_is_parse_error() {
    assert!(matches!(parse_auth_result("{}"), Err(IdentityError::Parse(_))));
    assert!(matches!(parse_auth_result("not json"), Err(IdentityError::Parse(_))));
}

// =============================================================================
// ERROR PARSING
// =============================================================================

#[test]
fn not_authorized_is_rejection_with_raw_message() {
    let body = r#"{"__type":"NotAuthorizedException","message":"Incorrect username or password."}"#;
    let err = parse_error(400, body);
    assert!(
        matches!(&err, IdentityError::Rejected { kind, message }
            if kind == "NotAuthorizedException" && message == "Incorrect username or password.")
    );
}

#[test]
fn namespaced_type_is_trimmed() {
    let body = r#"{"__type":"com.amazonaws.cognito#UserNotFoundException","Message":"User does not exist."}"#;
    let err = parse_error(400, body);
    assert!(
        matches!(&err, IdentityError::Rejected { kind, message }
            if kind == "UserNotFoundException" && message == "User does not exist.")
    );
}

#[test]
fn missing_message_falls_back_to_kind() {
    let err = parse_error(400, r#"{"__type":"UserNotConfirmedException"}"#);
    assert_eq!(err.to_string(), "UserNotConfirmedException");
}

#[test]
fn throttling_is_a_provider_error_not_a_rejection() {
    let body = r#"{"__type":"TooManyRequestsException","message":"Rate exceeded"}"#;
    let err = parse_error(400, body);
    assert!(
        matches!(&err, IdentityError::Provider { kind, message }
            if kind == "TooManyRequestsException" && message == "Rate exceeded")
    );
    assert!(!err.is_rejection());

    let body = r#"{"__type":"com.amazonaws.cognito#LimitExceededException","message":"Attempt limit exceeded"}"#;
    assert!(!parse_error(400, body).is_rejection());
}

#[test]
fn credential_refusals_are_rejections() {
    for kind in ["NotAuthorizedException", "UserNotFoundException", "PasswordResetRequiredException"] {
        let body = format!(r#"{{"__type":"{kind}","message":"refused"}}"#);
        assert!(parse_error(400, &body).is_rejection(), "{kind}");
    }
}

#[test]
fn server_errors_are_not_rejections() {
    let body = r#"{"__type":"InternalErrorException","message":"boom"}"#;
    assert!(matches!(parse_error(500, body), IdentityError::Response { status: 500, .. }));
}

#[test]
fn unrecognized_client_error_body_is_response_error() {
    assert!(matches!(parse_error(403, "<html>denied</html>"), IdentityError::Response { status: 403, .. }));
}
