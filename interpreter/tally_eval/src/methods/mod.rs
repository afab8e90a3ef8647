//! Per-type method and property dispatch.
//!
//! The original resolved member names through runtime reflection; here
//! the table is explicit: `(type tag, interned name)` maps to a function
//! pointer plus its declared argument shape. Registration happens once at
//! startup via [`MethodRegistry::with_builtins`]; re-registering a name
//! overwrites, which is how alternative naming layers (the JS-style
//! `push`/`pop` set over arrays) stack onto a base type.
//!
//! # Argument binding
//!
//! Actual arguments bind positionally. A missing required argument fails
//! with an argument-count error; a missing optional argument takes its
//! declared default, or the Null sentinel when it has none; a variadic
//! argument slurps the remaining actuals into an array. When a descriptor
//! asks for coercion, `Int`/`Str`-shaped arguments are narrowed to host
//! shapes before dispatch; otherwise raw values pass through so element
//! tagging survives (arrays want that, strings and dates do not).

mod arrays;
mod constructors;
mod dates;
mod helpers;
mod maps;
mod quantities;
mod strings;
mod tables;
mod times;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use tally_ir::{Name, StringInterner};
use tally_core::errors::{
    no_matching_constructor, no_such_method, no_such_property, property_not_readable,
    property_not_writable, unknown_type, wrong_arg_count, wrong_arg_type, EvalError,
};
use tally_core::{EvalResult, Limiter, TypeTag, UnitTable, Value};

/// Read-only context handed to every host method implementation.
pub struct HostCtx<'a> {
    pub units: &'a UnitTable,
    pub limiter: &'a Limiter,
    pub interner: &'a StringInterner,
}

/// Host method or property-accessor implementation.
pub type MethodImpl = fn(&HostCtx<'_>, &Value, &[Value]) -> EvalResult;

/// Host constructor implementation.
pub type CtorImpl = fn(&HostCtx<'_>, &[Value]) -> EvalResult;

/// Registry key: one member of one type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodKey {
    pub tag: TypeTag,
    pub name: Name,
}

/// Whether a member is invoked with parentheses or accessed as a slot.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MemberKind {
    Method,
    Property,
}

/// Host shape an argument coerces to when the descriptor asks for it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ArgKind {
    /// Raw value, forwarded unchanged.
    Any,
    /// Whole number.
    Int,
    /// Textual form.
    Str,
}

/// Declared shape of one method argument.
#[derive(Clone, Debug)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    pub default: Option<Value>,
    pub variadic: bool,
}

impl ArgSpec {
    pub fn required(name: &'static str, kind: ArgKind) -> Self {
        ArgSpec {
            name,
            kind,
            required: true,
            default: None,
            variadic: false,
        }
    }

    /// Optional without a default; absent binds the Null sentinel.
    pub fn optional(name: &'static str, kind: ArgKind) -> Self {
        ArgSpec {
            name,
            kind,
            required: false,
            default: None,
            variadic: false,
        }
    }

    pub fn with_default(name: &'static str, kind: ArgKind, default: Value) -> Self {
        ArgSpec {
            name,
            kind,
            required: false,
            default: Some(default),
            variadic: false,
        }
    }

    /// Slurps every remaining actual argument into an array.
    pub fn variadic(name: &'static str) -> Self {
        ArgSpec {
            name,
            kind: ArgKind::Any,
            required: false,
            default: None,
            variadic: true,
        }
    }
}

/// One registered member.
#[derive(Clone)]
pub struct MethodDescriptor {
    pub kind: MemberKind,
    /// Method body, or property getter.
    pub imp: MethodImpl,
    /// Property setter, when writable.
    pub setter: Option<MethodImpl>,
    pub args: Vec<ArgSpec>,
    /// Narrow `Int`/`Str` arguments to host shapes before dispatch.
    pub coerce: bool,
    pub can_get: bool,
    pub can_set: bool,
}

/// One registered constructor, participating in `new` checking.
#[derive(Copy, Clone)]
pub struct Constructor {
    pub imp: CtorImpl,
    pub min_args: usize,
    /// `None` means unbounded (variadic construction).
    pub max_args: Option<usize>,
}

/// The per-type member tables plus the constructor table.
#[derive(Default)]
pub struct MethodRegistry {
    members: FxHashMap<MethodKey, MethodDescriptor>,
    constructors: FxHashMap<String, Constructor>,
}

impl MethodRegistry {
    /// Empty registry; hosts extending the engine start here.
    pub fn new() -> Self {
        MethodRegistry::default()
    }

    /// Registry with every built-in type's members and constructors.
    pub fn with_builtins(interner: &StringInterner) -> Self {
        let mut registry = MethodRegistry::new();
        arrays::install(&mut registry, interner);
        strings::install(&mut registry, interner);
        maps::install(&mut registry, interner);
        tables::install(&mut registry, interner);
        dates::install(&mut registry, interner);
        times::install(&mut registry, interner);
        quantities::install(&mut registry, interner);
        constructors::install(&mut registry);
        registry
    }

    /// Register a member. Re-registering an existing name overwrites.
    pub fn register(&mut self, tag: TypeTag, name: Name, descriptor: MethodDescriptor) {
        self.members.insert(MethodKey { tag, name }, descriptor);
    }

    /// Register a method.
    pub fn register_method(
        &mut self,
        tag: TypeTag,
        name: Name,
        imp: MethodImpl,
        args: Vec<ArgSpec>,
        coerce: bool,
    ) {
        self.register(
            tag,
            name,
            MethodDescriptor {
                kind: MemberKind::Method,
                imp,
                setter: None,
                args,
                coerce,
                can_get: false,
                can_set: false,
            },
        );
    }

    /// Register a property with a getter and an optional setter.
    pub fn register_property(
        &mut self,
        tag: TypeTag,
        name: Name,
        getter: MethodImpl,
        setter: Option<MethodImpl>,
    ) {
        let can_set = setter.is_some();
        self.register(
            tag,
            name,
            MethodDescriptor {
                kind: MemberKind::Property,
                imp: getter,
                setter,
                args: Vec::new(),
                coerce: false,
                can_get: true,
                can_set,
            },
        );
    }

    /// Register a constructor under a type name.
    pub fn register_constructor(
        &mut self,
        type_name: &str,
        imp: CtorImpl,
        min_args: usize,
        max_args: Option<usize>,
    ) {
        self.constructors.insert(
            type_name.to_owned(),
            Constructor {
                imp,
                min_args,
                max_args,
            },
        );
    }

    /// Register an additional name for an already-registered constructor.
    pub fn register_alias(&mut self, alias: &str, existing: &str) {
        if let Some(ctor) = self.constructors.get(existing).copied() {
            self.constructors.insert(alias.to_owned(), ctor);
        }
    }

    pub fn has_method(&self, tag: TypeTag, name: Name) -> bool {
        self.members
            .get(&MethodKey { tag, name })
            .is_some_and(|d| d.kind == MemberKind::Method)
    }

    pub fn has_property(&self, tag: TypeTag, name: Name) -> bool {
        self.members
            .get(&MethodKey { tag, name })
            .is_some_and(|d| d.kind == MemberKind::Property)
    }

    /// Returns `true` if a `new` expression can target this type name.
    pub fn is_constructible(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Invoke a method by name.
    ///
    /// An unregistered name fails loudly; silent defaults would mask
    /// registration bugs.
    pub fn invoke(
        &self,
        ctx: &HostCtx<'_>,
        receiver: &Value,
        name: Name,
        args: &[Value],
    ) -> EvalResult {
        let name_str = ctx.interner.lookup(name);
        let key = MethodKey {
            tag: receiver.type_tag(),
            name,
        };
        let Some(descriptor) = self.members.get(&key) else {
            return Err(no_such_method(name_str, receiver.type_name()));
        };
        if descriptor.kind != MemberKind::Method {
            return Err(no_such_method(name_str, receiver.type_name()));
        }
        let bound = bind_args(name_str, &descriptor.args, descriptor.coerce, args)?;
        (descriptor.imp)(ctx, receiver, &bound)
    }

    /// Read a property by name.
    pub fn get_property(&self, ctx: &HostCtx<'_>, receiver: &Value, name: Name) -> EvalResult {
        let name_str = ctx.interner.lookup(name);
        let key = MethodKey {
            tag: receiver.type_tag(),
            name,
        };
        let Some(descriptor) = self.members.get(&key) else {
            return Err(no_such_property(name_str, receiver.type_name()));
        };
        if descriptor.kind != MemberKind::Property {
            return Err(no_such_property(name_str, receiver.type_name()));
        }
        if !descriptor.can_get {
            return Err(property_not_readable(name_str, receiver.type_name()));
        }
        (descriptor.imp)(ctx, receiver, &[])
    }

    /// Write a property by name.
    pub fn set_property(
        &self,
        ctx: &HostCtx<'_>,
        receiver: &Value,
        name: Name,
        value: Value,
    ) -> EvalResult {
        let name_str = ctx.interner.lookup(name);
        let key = MethodKey {
            tag: receiver.type_tag(),
            name,
        };
        let Some(descriptor) = self.members.get(&key) else {
            return Err(no_such_property(name_str, receiver.type_name()));
        };
        match descriptor.setter {
            Some(setter) if descriptor.can_set => setter(ctx, receiver, &[value]),
            _ => Err(property_not_writable(name_str, receiver.type_name())),
        }
    }

    /// Cardinality pre-flight: the binding check of [`Self::invoke`]
    /// without dispatch, for call sites that must not commit side effects
    /// on a doomed call.
    pub fn validate_call(
        &self,
        ctx: &HostCtx<'_>,
        receiver: &Value,
        name: Name,
        arg_count: usize,
    ) -> Result<(), EvalError> {
        let name_str = ctx.interner.lookup(name);
        let key = MethodKey {
            tag: receiver.type_tag(),
            name,
        };
        let Some(descriptor) = self.members.get(&key) else {
            return Err(no_such_method(name_str, receiver.type_name()));
        };
        let required = descriptor.args.iter().filter(|a| a.required).count();
        let variadic = descriptor.args.iter().any(|a| a.variadic);
        if arg_count < required {
            return Err(wrong_arg_count(name_str, required, arg_count));
        }
        if !variadic && arg_count > descriptor.args.len() {
            return Err(wrong_arg_count(name_str, descriptor.args.len(), arg_count));
        }
        Ok(())
    }

    /// Run a constructor for a `new` expression.
    pub fn construct(&self, ctx: &HostCtx<'_>, type_name: &str, args: &[Value]) -> EvalResult {
        let Some(ctor) = self.constructors.get(type_name) else {
            return Err(unknown_type(type_name));
        };
        let too_many = ctor.max_args.is_some_and(|max| args.len() > max);
        if args.len() < ctor.min_args || too_many {
            return Err(no_matching_constructor(type_name, args.len()));
        }
        (ctor.imp)(ctx, args)
    }
}

/// Bind actual arguments against a declared argument list.
fn bind_args(
    method: &str,
    specs: &[ArgSpec],
    coerce: bool,
    args: &[Value],
) -> Result<SmallVec<[Value; 4]>, EvalError> {
    let required = specs.iter().filter(|s| s.required).count();
    let mut bound = SmallVec::new();
    let mut next = 0;
    for spec in specs {
        if spec.variadic {
            let rest: Vec<Value> = args.get(next..).unwrap_or(&[]).to_vec();
            next = args.len();
            bound.push(Value::array(rest));
            continue;
        }
        if next < args.len() {
            bound.push(coerce_arg(method, spec, &args[next], coerce)?);
            next += 1;
        } else if spec.required {
            return Err(wrong_arg_count(method, required, args.len()));
        } else if let Some(default) = &spec.default {
            bound.push(default.clone());
        } else {
            // Absent optional with no default binds the Null sentinel.
            bound.push(Value::Null);
        }
    }
    if next < args.len() {
        return Err(wrong_arg_count(method, specs.len(), args.len()));
    }
    Ok(bound)
}

fn coerce_arg(
    method: &str,
    spec: &ArgSpec,
    value: &Value,
    coerce: bool,
) -> Result<Value, EvalError> {
    if !coerce {
        return Ok(value.clone());
    }
    match spec.kind {
        ArgKind::Any => Ok(value.clone()),
        ArgKind::Int => match value {
            Value::Number(n) => Ok(Value::Number(n.trunc())),
            _ => Err(wrong_arg_type(method, "number")),
        },
        ArgKind::Str => Ok(Value::string(value.render())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_core::ErrorKind;

    #[test]
    fn binding_grid() {
        // (a required, b optional default=5, rest variadic)
        let specs = vec![
            ArgSpec::required("a", ArgKind::Any),
            ArgSpec::with_default("b", ArgKind::Any, Value::Number(5.0)),
            ArgSpec::variadic("rest"),
        ];
        let bound = bind_args("m", &specs, false, &[Value::Number(1.0)]).unwrap();
        assert_eq!(bound[1], Value::Number(5.0));
        assert_eq!(bound[2], Value::array(vec![]));

        let bound = bind_args(
            "m",
            &specs,
            false,
            &[
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
                Value::Number(4.0),
            ],
        )
        .unwrap();
        assert_eq!(bound[1], Value::Number(2.0));
        assert_eq!(
            bound[2],
            Value::array(vec![Value::Number(3.0), Value::Number(4.0)])
        );
    }

    #[test]
    fn missing_required_fails() {
        let specs = vec![ArgSpec::required("a", ArgKind::Any)];
        let err = bind_args("m", &specs, false, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
    }

    #[test]
    fn extra_args_without_variadic_fail() {
        let specs = vec![ArgSpec::required("a", ArgKind::Any)];
        let err =
            bind_args("m", &specs, false, &[Value::Null, Value::Null]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
    }

    #[test]
    fn absent_optional_binds_null() {
        let specs = vec![ArgSpec::optional("a", ArgKind::Any)];
        let bound = bind_args("m", &specs, false, &[]).unwrap();
        assert_eq!(bound[0], Value::Null);
    }

    #[test]
    fn coercion_narrows_shapes() {
        let spec = ArgSpec::required("i", ArgKind::Int);
        let v = coerce_arg("m", &spec, &Value::Number(3.9), true).unwrap();
        assert_eq!(v, Value::Number(3.0));
        let err = coerce_arg("m", &spec, &Value::string("x"), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);

        let spec = ArgSpec::required("s", ArgKind::Str);
        let v = coerce_arg("m", &spec, &Value::Number(3.0), true).unwrap();
        assert_eq!(v, Value::string("3"));
        // Without the coerce flag the raw value passes through.
        let v = coerce_arg("m", &spec, &Value::Number(3.0), false).unwrap();
        assert_eq!(v, Value::Number(3.0));
    }

    #[test]
    fn validate_call_preflights_cardinality() {
        let interner = StringInterner::new();
        let mut registry = MethodRegistry::new();
        let insert = interner.intern("insert");
        registry.register_method(
            TypeTag::Array,
            insert,
            |_, _, _| Ok(Value::Null),
            vec![
                ArgSpec::required("index", ArgKind::Int),
                ArgSpec::required("value", ArgKind::Any),
            ],
            false,
        );
        let add_all = interner.intern("addAll");
        registry.register_method(
            TypeTag::Array,
            add_all,
            |_, _, _| Ok(Value::Null),
            vec![ArgSpec::variadic("values")],
            false,
        );
        let units = UnitTable::new();
        let limiter = Limiter::default();
        let ctx = HostCtx {
            units: &units,
            limiter: &limiter,
            interner: &interner,
        };
        let recv = Value::array(vec![]);

        assert!(registry.validate_call(&ctx, &recv, insert, 2).is_ok());
        // Missing required argument.
        let err = registry.validate_call(&ctx, &recv, insert, 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
        // Surplus argument with no variadic to absorb it.
        let err = registry.validate_call(&ctx, &recv, insert, 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
        // A variadic absorbs any surplus.
        assert!(registry.validate_call(&ctx, &recv, add_all, 5).is_ok());
        // Unregistered name.
        let missing = interner.intern("frobnicate");
        let err = registry
            .validate_call(&ctx, &recv, missing, 0)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
    }

    #[test]
    fn reregistration_overwrites() {
        let interner = StringInterner::new();
        let mut registry = MethodRegistry::new();
        let name = interner.intern("length");
        registry.register_method(
            TypeTag::Array,
            name,
            |_, _, _| Ok(Value::Number(1.0)),
            vec![],
            false,
        );
        registry.register_method(
            TypeTag::Array,
            name,
            |_, _, _| Ok(Value::Number(2.0)),
            vec![],
            false,
        );
        let units = UnitTable::new();
        let limiter = Limiter::default();
        let ctx = HostCtx {
            units: &units,
            limiter: &limiter,
            interner: &interner,
        };
        let out = registry
            .invoke(&ctx, &Value::array(vec![]), name, &[])
            .unwrap();
        assert_eq!(out, Value::Number(2.0));
    }
}
