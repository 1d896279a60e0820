//! The fixed rule table: one rule per response-schema migration.
//!
//! Each rule rewrites the bare object-literal return of one service method
//! into a `create(<Schema>, { ... })` call. Because the methods share the
//! `return { <field> };` shape, most rules disambiguate by a lookahead
//! marker: the declaration of the next method in the file. This is a textual
//! heuristic and holds only while the target file keeps its method order.

use regex::Captures;

use super::engine::{Replacement, Rule};

fn send_otp_replacement(caps: &Captures) -> String {
    format!(
        "{}return create(SendOTPResponseSchema, {{ success: {}, message: {}}});",
        &caps[1], &caps[3], &caps[4]
    )
}

/// The rewrite table for strategyService.ts, in application order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        // The patterned updateStrategyPrivacy rule below was not specific
        // enough on its own; match the exact snippet first.
        Rule::Literal {
            name: "update_strategy_privacy_literal",
            from: "return { strategy };\n  },\n\n  async updateStrategyPrivacy(",
            to: "return create(UpdateStrategyPrivacyResponseSchema, { strategy });\n  },\n\n  async updateStrategyPrivacy(",
        },
        Rule::Pattern {
            name: "update_strategy_privacy",
            pattern: r"(\s+)(return \{ strategy \};)(\s+\}[\s,]+async updateStrategyPrivacy)",
            lookahead: None,
            replacement: Replacement::Template(
                "${1}return create(UpdateStrategyPrivacyResponseSchema, { strategy });${3}",
            ),
        },
        Rule::Pattern {
            name: "send_otp",
            pattern: r"(async sendOTP[\s\S]*?)(return \{[\s\n]+success: (true|false),[\s\n]+message: ([^}]+)\};)",
            lookahead: None,
            replacement: Replacement::Computed(send_otp_replacement),
        },
        Rule::Pattern {
            name: "get_current_user",
            pattern: r"return \{ user: (protoUser|undefined) \};",
            lookahead: Some("async updateUser"),
            replacement: Replacement::Template(
                "return create(GetCurrentUserResponseSchema, { user: ${1} });",
            ),
        },
        Rule::Pattern {
            name: "update_user",
            pattern: r"return \{ user: protoUser \};",
            lookahead: Some("async followUser"),
            replacement: Replacement::Template(
                "return create(UpdateUserResponseSchema, { user: protoUser });",
            ),
        },
        Rule::Pattern {
            name: "follow_user",
            pattern: r"return \{ success: true \};",
            lookahead: Some("async unfollowUser"),
            replacement: Replacement::Template(
                "return create(FollowUserResponseSchema, { success: true });",
            ),
        },
        Rule::Pattern {
            name: "unfollow_user",
            pattern: r"return \{ success: true \};",
            lookahead: Some("async listFollowing"),
            replacement: Replacement::Template(
                "return create(UnfollowUserResponseSchema, { success: true });",
            ),
        },
        Rule::Pattern {
            name: "list_following",
            pattern: r"return \{ users \};",
            lookahead: Some("async listFollowers"),
            replacement: Replacement::Template(
                "return create(ListFollowingResponseSchema, { users });",
            ),
        },
        Rule::Pattern {
            name: "list_followers",
            pattern: r"return \{ users \};",
            lookahead: Some("async listCloseFriends"),
            replacement: Replacement::Template(
                "return create(ListFollowersResponseSchema, { users });",
            ),
        },
        Rule::Pattern {
            name: "list_close_friends",
            pattern: r"return \{ users \};",
            lookahead: Some("async getUserProfile"),
            replacement: Replacement::Template(
                "return create(ListCloseFriendsResponseSchema, { users });",
            ),
        },
        // Last method in the file; anchor on the module's closing brace line
        Rule::Pattern {
            name: "copy_strategy",
            pattern: r"return \{ strategy \};",
            lookahead: Some("\n};"),
            replacement: Replacement::Template(
                "return create(CopyStrategyResponseSchema, { strategy });",
            ),
        },
    ]
}

// ============================================================================
// Tests
// ============================================================================
