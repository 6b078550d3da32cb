use crate::interner::{Interner, Kw, Symbol};

#[test]
fn intern_is_idempotent() {
    let mut interner = Interner::new();
    let a = interner.intern("greet");
    let b = interner.intern("greet");
    assert_eq!(a, b);
    assert_eq!(interner.resolve(a), "greet");
}

#[test]
fn distinct_strings_get_distinct_symbols() {
    let mut interner = Interner::new();
    let a = interner.intern("alpha");
    let b = interner.intern("beta");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), "alpha");
    assert_eq!(interner.resolve(b), "beta");
}

#[test]
fn keywords_occupy_the_leading_range() {
    let interner = Interner::new();
    for (idx, &kw) in Kw::ALL.iter().enumerate() {
        let sym = Symbol::from_kw(kw);
        assert_eq!(sym.as_u32(), idx as u32);
        assert_eq!(interner.resolve(sym), kw.as_str());
    }
}

#[test]
fn interning_a_keyword_spelling_returns_its_fixed_symbol() {
    let mut interner = Interner::new();
    assert_eq!(interner.intern("while"), Symbol::from_kw(Kw::While));
    assert_eq!(interner.intern("func"), Symbol::from_kw(Kw::Func));
    assert_eq!(interner.intern("_"), Symbol::from_kw(Kw::Underscore));
}

#[test]
fn user_symbols_never_collide_with_keywords() {
    let mut interner = Interner::new();
    let user = interner.intern("my_name");
    assert!(user.as_u32() >= Kw::ALL.len() as u32);
    assert!(!user.is_some_kw());
}

#[test]
fn is_some_kw_spans_and_through_while() {
    assert!(Symbol::from_kw(Kw::And).is_some_kw());
    assert!(Symbol::from_kw(Kw::While).is_some_kw());
    assert!(Symbol::from_kw(Kw::Match).is_some_kw());
    assert!(!Symbol::from_kw(Kw::Empty).is_some_kw());
    assert!(!Symbol::from_kw(Kw::Root).is_some_kw());
    assert!(!Symbol::from_kw(Kw::Underscore).is_some_kw());
}

#[test]
fn operator_keywords() {
    assert_eq!(
        Symbol::from_kw(Kw::Not).as_operator_kw(),
        Some((Kw::Not, 3))
    );
    assert_eq!(
        Symbol::from_kw(Kw::And).as_operator_kw(),
        Some((Kw::And, 3))
    );
    assert_eq!(Symbol::from_kw(Kw::Or).as_operator_kw(), Some((Kw::Or, 2)));
    assert_eq!(Symbol::from_kw(Kw::If).as_operator_kw(), None);
}

#[test]
fn path_segment_keywords() {
    assert!(Symbol::from_kw(Kw::Super).is_path_seg());
    assert!(Symbol::from_kw(Kw::Party).is_path_seg());
    assert!(Symbol::from_kw(Kw::SelfLower).is_path_seg());
    assert!(!Symbol::from_kw(Kw::While).is_path_seg());

    let mut interner = Interner::new();
    assert!(interner.intern("user_ident").is_path_seg());
}

#[test]
fn symbols_serialize_as_raw_indices() {
    let sym = Symbol::from_kw(Kw::Func);
    assert_eq!(
        serde_json::to_string(&sym).unwrap(),
        sym.as_u32().to_string()
    );
}

#[test]
fn try_resolve_unknown_symbol() {
    let interner = Interner::new();
    assert!(interner.try_resolve(Symbol::from_raw(9999)).is_none());
}

#[test]
#[should_panic(expected = "[ICE]")]
fn resolve_unknown_symbol_ices() {
    let interner = Interner::new();
    let _ = interner.resolve(Symbol::from_raw(9999));
}
