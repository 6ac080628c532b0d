//! Behavior of the builtin operator table, observed through `PRINT`ed
//! display forms (base-2 numerals).

mod common;

use common::*;
use prefix::ErrorKind;
use pretty_assertions::assert_eq;

// === Conversions ===

#[test]
fn str_of_int_is_base_two() {
    assert_eq!(print_of("STR", vec![int(5)]), "101");
    assert_eq!(print_of("STR", vec![int(-3)]), "-11");
    assert_eq!(print_of("STR", vec![int(0)]), "0");
}

#[test]
fn int_of_str_round_trips() {
    // INT(STR(n)) = n
    for n in [0, 1, 5, 13, 200, -7] {
        let out = print_of("EQ", vec![call("INT", vec![call("STR", vec![int(n)])]), int(n)]);
        assert_eq!(out, "1", "round trip failed for {n}");
    }
}

#[test]
fn int_of_invalid_str_follows_the_convention() {
    assert_eq!(print_of("INT", vec![str_("")]), "0");
    assert_eq!(print_of("INT", vec![str_("201")]), "1");
    assert_eq!(print_of("INT", vec![str_("binary")]), "1");
}

#[test]
fn flt_round_trips_terminating_expansions() {
    // FLT(STR(x)) = x for terminating base-2 expansions
    for x in [0.0, 0.5, 2.25, 10.625] {
        let out = print_of("EQ", vec![call("FLT", vec![call("STR", vec![flt(x)])]), flt(x)]);
        assert_eq!(out, "1", "round trip failed for {x}");
    }
}

#[test]
fn int_truncates_floats() {
    assert_eq!(print_of("INT", vec![flt(2.9)]), "10");
    assert_eq!(print_of("INT", vec![flt(-2.9)]), "-10");
}

#[test]
fn type_probes() {
    assert_eq!(print_of("ISINT", vec![int(1)]), "1");
    assert_eq!(print_of("ISINT", vec![flt(1.0)]), "0");
    assert_eq!(print_of("ISFLT", vec![flt(1.0)]), "1");
    assert_eq!(print_of("ISSTR", vec![str_("x")]), "1");
    assert_eq!(print_of("TYPE", vec![int(1)]), "int");
    assert_eq!(print_of("TYPE", vec![str_("x")]), "str");
}

// === Strict arithmetic ===

#[test]
fn strict_arithmetic_requires_matching_tags() {
    let exc = error_of("ADD", vec![int(1), flt(1.0)]);
    assert_eq!(exc.kind, ErrorKind::Type);
}

#[test]
fn division_by_zero_fails() {
    assert_eq!(error_of("DIV", vec![int(1), int(0)]).kind, ErrorKind::Arithmetic);
    assert_eq!(error_of("MOD", vec![int(1), int(0)]).kind, ErrorKind::Arithmetic);
    assert_eq!(error_of("FDIV", vec![flt(1.0), flt(0.0)]).kind, ErrorKind::Arithmetic);
}

#[test]
fn pow_rejects_negative_integer_exponent() {
    assert_eq!(error_of("POW", vec![int(2), int(-1)]).kind, ErrorKind::Arithmetic);
    assert_eq!(print_of("POW", vec![int(2), int(5)]), "100000");
}

#[test]
fn integer_overflow_is_an_arithmetic_error() {
    assert_eq!(
        error_of("ADD", vec![int(i64::MAX), int(1)]).kind,
        ErrorKind::Arithmetic
    );
}

#[test]
fn neg_is_strict_and_inv_coerces() {
    assert_eq!(print_of("NEG", vec![int(5)]), "-101");
    assert_eq!(print_of("NEG", vec![flt(0.5)]), "-0.1");
    assert_eq!(print_of("INV", vec![int(2)]), "0.1");
    assert_eq!(error_of("INV", vec![int(0)]).kind, ErrorKind::Arithmetic);
}

#[test]
fn add_of_value_and_its_negation_is_zero() {
    for n in [1, 42, -9, 1000] {
        let out = print_of("ADD", vec![int(n), call("NEG", vec![int(n)])]);
        assert_eq!(out, "0");
    }
}

#[test]
fn mul_by_reciprocal_is_one_within_precision() {
    for x in [0.5f64, 3.0, 1234.5] {
        // |FMUL(x, INV(x)) - 1| < 2^-40
        let diff = call("FSUB", vec![call("FMUL", vec![flt(x), call("INV", vec![flt(x)])]), flt(1.0)]);
        let magnitude = call("MAX", vec![diff.clone(), call("NEG", vec![diff])]);
        let out = print_of("LT", vec![magnitude, flt((2.0f64).powi(-40))]);
        assert_eq!(out, "1", "reciprocal identity failed for {x}");
    }
}

// === Coercing families ===

#[test]
fn coercing_integer_family_truncates() {
    assert_eq!(print_of("IADD", vec![flt(2.9), int(1)]), "11");
    assert_eq!(print_of("IDIV", vec![int(7), int(2)]), "11");
    assert_eq!(print_of("ISUM", vec![int(1), flt(2.5), int(3)]), "110");
    assert_eq!(print_of("IPROD", vec![int(2), int(3), int(4)]), "11000");
}

#[test]
fn coercing_float_family_widens() {
    assert_eq!(print_of("FADD", vec![int(1), int(1)]), "10.0");
    assert_eq!(print_of("FDIV", vec![int(1), int(2)]), "0.1");
    assert_eq!(print_of("FSUM", vec![int(1), flt(0.5)]), "1.1");
}

#[test]
fn cdiv_takes_the_ceiling() {
    assert_eq!(print_of("CDIV", vec![int(7), int(2)]), "100");
    assert_eq!(print_of("CDIV", vec![int(8), int(2)]), "100");
    assert_eq!(print_of("CDIV", vec![int(-7), int(2)]), "-11");
    assert_eq!(error_of("CDIV", vec![int(1), int(0)]).kind, ErrorKind::Arithmetic);
}

// === Roots and logarithms ===

#[test]
fn integer_root_is_the_floor() {
    assert_eq!(print_of("ROOT", vec![int(8), int(3)]), "10");
    assert_eq!(print_of("ROOT", vec![int(26), int(3)]), "10");
    assert_eq!(print_of("ROOT", vec![int(27), int(3)]), "11");
    assert_eq!(print_of("ROOT", vec![int(1_000_000), int(2)]), format!("{:b}", 1000));
}

#[test]
fn root_sign_rules() {
    // even root of a negative int fails; odd root negates
    assert_eq!(error_of("ROOT", vec![int(-4), int(2)]).kind, ErrorKind::Arithmetic);
    assert_eq!(print_of("ROOT", vec![int(-27), int(3)]), "-11");
    // negative exponent: reciprocal of the positive-exponent root
    assert_eq!(print_of("ROOT", vec![int(8), int(-3)]), "0");
    assert_eq!(print_of("ROOT", vec![int(1), int(-5)]), "1");
    assert_eq!(error_of("ROOT", vec![int(8), int(0)]).kind, ErrorKind::Arithmetic);
}

#[test]
fn iroot_coerces_and_froot_stays_float() {
    assert_eq!(print_of("IROOT", vec![flt(27.9), int(3)]), "11");
    assert_eq!(print_of("FROOT", vec![int(4), int(2)]), "10.0");
}

#[test]
fn log_is_floor_and_clog_is_ceiling() {
    assert_eq!(print_of("LOG", vec![int(1)]), "0");
    assert_eq!(print_of("LOG", vec![int(8)]), "11");
    assert_eq!(print_of("LOG", vec![int(9)]), "11");
    assert_eq!(print_of("CLOG", vec![int(8)]), "11");
    assert_eq!(print_of("CLOG", vec![int(9)]), "100");
    assert_eq!(print_of("CLOG", vec![int(1)]), "0");
    assert_eq!(error_of("LOG", vec![int(0)]).kind, ErrorKind::Arithmetic);
}

#[test]
fn gcd_lcm_on_absolute_values() {
    assert_eq!(print_of("GCD", vec![int(12), int(18)]), "110");
    assert_eq!(print_of("GCD", vec![int(-4), int(6)]), "10");
    assert_eq!(print_of("GCD", vec![flt(12.0), int(18)]), "110");
    assert_eq!(print_of("LCM", vec![int(4), int(6)]), "1100");
    assert_eq!(print_of("LCM", vec![int(0), int(5)]), "0");
    assert_eq!(error_of("GCD", vec![flt(1.5), int(2)]).kind, ErrorKind::Type);
}

#[test]
fn gcd_times_lcm_is_the_absolute_product() {
    for (a, b) in [(4i64, 6i64), (12, 18), (-3, 7), (21, 14)] {
        let product = call("GCD", vec![int(a), int(b)]);
        let times = call("MUL", vec![product, call("LCM", vec![int(a), int(b)])]);
        let out = print_of("EQ", vec![times, int((a * b).abs())]);
        assert_eq!(out, "1", "identity failed for {a}, {b}");
    }
}

// === Comparison and logic ===

#[test]
fn eq_returns_zero_on_tag_mismatch() {
    assert_eq!(print_of("EQ", vec![int(1), flt(1.0)]), "0");
    assert_eq!(print_of("EQ", vec![str_("a"), str_("a")]), "1");
    assert_eq!(print_of("EQ", vec![str_("a"), str_("b")]), "0");
}

#[test]
fn ordered_comparisons_require_numeric_tags() {
    assert_eq!(print_of("LT", vec![int(1), int(2)]), "1");
    assert_eq!(print_of("GTE", vec![flt(2.0), flt(2.0)]), "1");
    assert_eq!(error_of("LT", vec![str_("a"), str_("b")]).kind, ErrorKind::Type);
    assert_eq!(error_of("LT", vec![int(1), flt(2.0)]).kind, ErrorKind::Type);
}

#[test]
fn logic_operates_on_truthiness() {
    assert_eq!(print_of("AND", vec![int(2), str_("x")]), "1");
    assert_eq!(print_of("AND", vec![int(2), str_("")]), "0");
    assert_eq!(print_of("OR", vec![int(0), flt(0.0)]), "0");
    assert_eq!(print_of("XOR", vec![int(1), int(2)]), "0");
    assert_eq!(print_of("XOR", vec![int(1), int(0)]), "1");
    assert_eq!(print_of("NOT", vec![str_("")]), "1");
    assert_eq!(print_of("BOOL", vec![flt(0.25)]), "1");
}

// === Bitwise ===

#[test]
fn bitwise_operators() {
    assert_eq!(print_of("BAND", vec![int(6), int(3)]), "10");
    assert_eq!(print_of("BOR", vec![int(6), int(1)]), "111");
    assert_eq!(print_of("BXOR", vec![int(6), int(3)]), "101");
    assert_eq!(print_of("BNOT", vec![int(0)]), "-1");
    assert_eq!(print_of("SHL", vec![int(1), int(3)]), "1000");
    assert_eq!(print_of("SHR", vec![int(-8), int(1)]), "-100");
}

#[test]
fn shifts_reject_negative_amounts() {
    assert_eq!(error_of("SHL", vec![int(1), int(-1)]).kind, ErrorKind::Arithmetic);
    assert_eq!(error_of("SHR", vec![int(1), int(-1)]).kind, ErrorKind::Arithmetic);
}

#[test]
fn bitwise_requires_ints() {
    assert_eq!(error_of("BAND", vec![int(1), flt(1.0)]).kind, ErrorKind::Type);
}

// === Strings ===

#[test]
fn string_operators() {
    assert_eq!(print_of("SLEN", vec![str_("hello")]), "101");
    assert_eq!(print_of("UPPER", vec![str_("aBé")]), "ABé");
    assert_eq!(print_of("LOWER", vec![str_("AbÉ")]), "abÉ");
    assert_eq!(print_of("SLICE", vec![str_("hello"), int(2), int(4)]), "el");
    assert_eq!(print_of("SLICE", vec![str_("hello"), int(-3), int(-1)]), "ll");
    assert_eq!(print_of("REPLACE", vec![str_("a-b-c"), str_("-"), str_("+")]), "a+b+c");
    assert_eq!(print_of("STRIP", vec![str_("xxhixx"), str_("x")]), "hi");
    assert_eq!(print_of("JOIN", vec![str_(","), str_("a"), str_("b"), str_("c")]), "a,b,c");
    assert_eq!(print_of("JOIN", vec![str_(",")]), "");
}

#[test]
fn join_requires_string_parts() {
    assert_eq!(error_of("JOIN", vec![str_(","), int(1)]).kind, ErrorKind::Type);
}

// === Reductions ===

#[test]
fn numeric_reductions_enforce_one_tag() {
    assert_eq!(print_of("SUM", vec![int(1), int(2), int(3)]), "110");
    assert_eq!(print_of("PROD", vec![int(2), int(3), int(4)]), "11000");
    assert_eq!(print_of("SUM", vec![flt(0.5), flt(0.25)]), "0.11");
    assert_eq!(error_of("SUM", vec![int(1), flt(2.0)]).kind, ErrorKind::Type);
    assert_eq!(error_of("SUM", vec![str_("a")]).kind, ErrorKind::Type);
}

#[test]
fn max_min_on_strings_use_length() {
    assert_eq!(print_of("MAX", vec![str_("a"), str_("bbb"), str_("cc")]), "bbb");
    assert_eq!(print_of("MIN", vec![str_("aaa"), str_("b"), str_("cc")]), "b");
    assert_eq!(print_of("MAX", vec![int(3), int(9), int(4)]), "1001");
    assert_eq!(print_of("MIN", vec![flt(0.5), flt(0.25)]), "0.01");
}

#[test]
fn any_all_fold_truthiness() {
    assert_eq!(print_of("ANY", vec![int(0), str_(""), int(5)]), "1");
    assert_eq!(print_of("ANY", vec![int(0), str_("")]), "0");
    assert_eq!(print_of("ALL", vec![int(1), str_("x")]), "1");
    assert_eq!(print_of("ALL", vec![int(1), int(0)]), "0");
}

// === PRINT, ASSERT, THROW ===

#[test]
fn print_separates_arguments_with_spaces() {
    let out = run_ok(&[expr_stmt(call("PRINT", vec![int(1), str_("x"), flt(2.5)]))]);
    assert_eq!(out, "1 x 10.1\n");
}

#[test]
fn print_with_no_arguments_emits_a_newline() {
    assert_eq!(run_ok(&[expr_stmt(call("PRINT", vec![]))]), "\n");
}

#[test]
fn print_displays_null_and_functions() {
    let out = run_ok(&[
        func_def("f", prefix::DeclType::Int, vec![], vec![ret(int(0))]),
        expr_stmt(call("PRINT", vec![call("COPY", vec![ident("f")])])),
    ]);
    assert_eq!(out, "<func f>\n");

    // PRINT itself evaluates to null
    let out = run_ok(&[expr_stmt(call("PRINT", vec![call("PRINT", vec![int(1)])]))]);
    assert_eq!(out, "1\nnull\n");
}

#[test]
fn assert_fails_on_falsy() {
    assert_eq!(error_of("ASSERT", vec![int(0)]).message, "assertion failed");
    assert_eq!(
        error_of("ASSERT", vec![int(0), str_("custom")]).message,
        "custom"
    );
    assert_eq!(run_ok(&[expr_stmt(call("ASSERT", vec![int(1)]))]), "");
}

#[test]
fn throw_requires_a_string_message() {
    assert_eq!(error_of("THROW", vec![int(1)]).kind, ErrorKind::Type);
}

// === Variable operators ===

#[test]
fn del_and_exist_act_on_bindings() {
    let out = run_ok(&[
        assign("x", Some(prefix::DeclType::Int), int(1)),
        print1(call("EXIST", vec![ident("x")])),
        expr_stmt(call("DEL", vec![ident("x")])),
        print1(call("EXIST", vec![ident("x")])),
    ]);
    assert_eq!(out, "1\n0\n");
}

#[test]
fn exist_does_not_evaluate_its_argument() {
    // an unbound name is a plain 0, not a name error
    assert_eq!(print_of("EXIST", vec![ident("never_bound")]), "0");
}

#[test]
fn del_requires_a_bare_identifier() {
    let exc = error_of("DEL", vec![call("ADD", vec![int(1), int(2)])]);
    assert_eq!(exc.kind, ErrorKind::Type);
}

#[test]
fn copy_returns_an_independent_value() {
    assert_eq!(print_of("COPY", vec![int(5)]), "101");
    assert_eq!(print_of("COPY", vec![str_("s")]), "s");
}

// === Arity and environment operators ===

#[test]
fn arity_violations_are_reported() {
    assert_eq!(error_of("ADD", vec![int(1)]).kind, ErrorKind::Arity);
    assert_eq!(error_of("SLEN", vec![]).kind, ErrorKind::Arity);
    assert_eq!(
        error_of("SLICE", vec![str_("x"), int(1)]).kind,
        ErrorKind::Arity
    );
}

#[test]
fn main_reports_primary_module() {
    assert_eq!(print_of("MAIN", vec![]), "1");
}

#[test]
fn os_reports_the_platform() {
    assert_eq!(print_of("OS", vec![]), std::env::consts::OS);
}

#[test]
fn import_without_a_loader_fails() {
    assert_eq!(
        error_of("IMPORT", vec![str_("lib")]).kind,
        ErrorKind::Extension
    );
}
