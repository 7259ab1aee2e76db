//! A small tree-walking evaluator for transformed programs.
//!
//! Only the subset the scenario fixtures need is supported: integers,
//! booleans, strings and object references; classes with fields,
//! constructors and methods (nested types included); `if`, `while`, `for`,
//! `switch` with fall-through, `return` and `throw`. Output written through
//! `System.out.println` is captured line by line.
//!
//! Overloads are chosen at runtime from the argument values, which is
//! enough to tell `log(int)` from `log(String)`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use polyver_ast::{
    BinaryOp, CompilationUnit, Expr, ForStmt, Literal, Member, MethodCall, MethodDecl, Param, Stmt,
    TypeDecl, TypeRef, UnaryOp,
};

pub type ObjRef = Rc<RefCell<Object>>;

#[derive(Debug)]
pub struct Object {
    /// Qualified class name, e.g. `Test.V1_Impl`.
    pub class: String,
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Bool(bool),
    Str(String),
    Obj(ObjRef),
}

impl Value {
    pub fn as_obj(&self) -> Option<&ObjRef> {
        match self {
            Value::Obj(obj) => Some(obj),
            _ => None,
        }
    }

    /// Whether this value may be passed for a parameter of type `ty`.
    fn fits(&self, ty: &TypeRef) -> bool {
        if ty.array_dims > 0 {
            return matches!(self, Value::Null | Value::Obj(_));
        }
        let name = ty.name.as_str();
        match self {
            Value::Int(_) => matches!(name, "int" | "long" | "short" | "byte"),
            Value::Bool(_) => name == "boolean",
            Value::Str(_) => matches!(name, "String" | "Object" | "CharSequence"),
            Value::Obj(_) => !is_primitive(name) && name != "String",
            Value::Null => !is_primitive(name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Obj(obj) => write!(f, "{}@{:p}", obj.borrow().class, Rc::as_ptr(obj)),
        }
    }
}

/// An uncaught exception or an evaluation the evaluator cannot perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError(pub String);

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Eval<T> = Result<T, RuntimeError>;

fn fail<T>(message: impl Into<String>) -> Eval<T> {
    Err(RuntimeError(message.into()))
}

fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "int" | "long" | "short" | "byte" | "char" | "boolean" | "float" | "double"
    )
}

fn default_value(ty: &TypeRef) -> Value {
    if ty.array_dims > 0 {
        return Value::Null;
    }
    match ty.name.as_str() {
        "int" | "long" | "short" | "byte" | "char" => Value::Int(0),
        "boolean" => Value::Bool(false),
        _ => Value::Null,
    }
}

fn params_fit(params: &[Param], args: &[Value]) -> bool {
    params.len() == args.len() && params.iter().zip(args).all(|(p, a)| a.fits(&p.ty))
}

fn is_println(call: &MethodCall) -> bool {
    call.name == "println"
        && matches!(
            call.receiver.as_deref(),
            Some(Expr::FieldAccess(f)) if f.name == "out" && f.receiver.as_name() == Some("System")
        )
}

enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

struct ClassDef {
    decl: TypeDecl,
    /// Qualified name of the enclosing class, for nested types.
    enclosing: Option<String>,
}

struct Frame {
    this: Option<ObjRef>,
    class: String,
    scopes: Vec<HashMap<String, Value>>,
}

impl Frame {
    fn new(this: Option<ObjRef>, class: impl Into<String>) -> Self {
        Self {
            this,
            class: class.into(),
            scopes: vec![HashMap::new()],
        }
    }

    fn declare(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn local(&self, name: &str) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }

    fn set_local(&mut self, name: &str, value: Value) -> Result<(), Value> {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(value),
        }
    }

    fn this_field(&self, name: &str) -> Option<Value> {
        self.this
            .as_ref()
            .and_then(|obj| obj.borrow().fields.get(name).cloned())
    }
}

/// Evaluates programs made of [`CompilationUnit`]s.
pub struct Interpreter {
    classes: HashMap<String, ClassDef>,
    output: Vec<String>,
}

impl Interpreter {
    pub fn new(units: &[CompilationUnit]) -> Self {
        let mut interp = Self {
            classes: HashMap::new(),
            output: Vec::new(),
        };
        for ty in units.iter().flat_map(|u| &u.types) {
            interp.register(ty, None);
        }
        interp
    }

    fn register(&mut self, ty: &TypeDecl, enclosing: Option<&str>) {
        let qualified = match enclosing {
            Some(outer) => format!("{}.{}", outer, ty.name),
            None => ty.name.clone(),
        };
        for member in &ty.members {
            if let Member::Type(nested) = member {
                self.register(nested, Some(&qualified));
            }
        }
        self.classes.insert(
            qualified,
            ClassDef {
                decl: ty.clone(),
                enclosing: enclosing.map(str::to_string),
            },
        );
    }

    /// Lines printed so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Run `public static void main(String[] args)` of `class` and return
    /// everything it printed.
    pub fn run_main(&mut self, class: &str) -> Eval<Vec<String>> {
        self.invoke(class, None, "main", vec![Value::Null])?;
        Ok(std::mem::take(&mut self.output))
    }

    /// `new <class>(args)` from outside any class.
    pub fn instantiate(&mut self, class: &str, args: Vec<Value>) -> Eval<ObjRef> {
        let Some(qualified) = self.resolve_class(None, class) else {
            return fail(format!("unknown class {}", class));
        };
        self.construct(&qualified, args)
    }

    /// `obj.<name>(args)` from outside any class.
    pub fn call(&mut self, obj: &ObjRef, name: &str, args: Vec<Value>) -> Eval<Value> {
        let class = obj.borrow().class.clone();
        self.invoke(&class, Some(obj.clone()), name, args)
    }

    /// Find `name` from inside `context`: nested types of the context and
    /// its enclosing classes first, then top-level types.
    fn resolve_class(&self, context: Option<&str>, name: &str) -> Option<String> {
        let mut scope = context.map(str::to_string);
        while let Some(current) = scope {
            let candidate = format!("{}.{}", current, name);
            if self.classes.contains_key(&candidate) {
                return Some(candidate);
            }
            scope = self
                .classes
                .get(&current)
                .and_then(|c| c.enclosing.clone());
        }
        self.classes.contains_key(name).then(|| name.to_string())
    }

    fn find_method(&self, class: &str, name: &str, args: &[Value]) -> Eval<MethodDecl> {
        let Some(def) = self.classes.get(class) else {
            return fail(format!("unknown class {}", class));
        };
        def.decl
            .methods()
            .find(|m| m.name == name && params_fit(&m.params, args))
            .cloned()
            .ok_or_else(|| RuntimeError(format!("no method {}.{} for {:?}", class, name, args)))
    }

    fn invoke(
        &mut self,
        class: &str,
        this: Option<ObjRef>,
        name: &str,
        args: Vec<Value>,
    ) -> Eval<Value> {
        let method = self.find_method(class, name, &args)?;
        let Some(body) = &method.body else {
            return fail(format!("{}.{} has no body", class, name));
        };
        let mut frame = Frame::new(this, class);
        for (param, arg) in method.params.iter().zip(args) {
            frame.declare(&param.name, arg);
        }
        match self.exec_block(&mut frame, &body.stmts)? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }

    fn construct(&mut self, class: &str, args: Vec<Value>) -> Eval<ObjRef> {
        let Some(decl) = self.classes.get(class).map(|c| c.decl.clone()) else {
            return fail(format!("unknown class {}", class));
        };
        let obj = Rc::new(RefCell::new(Object {
            class: class.to_string(),
            fields: HashMap::new(),
        }));

        let mut frame = Frame::new(Some(obj.clone()), class);
        for field in decl.fields() {
            for var in &field.variables {
                let value = match &var.init {
                    Some(init) => self.eval(&mut frame, init)?,
                    None => default_value(&field.ty),
                };
                obj.borrow_mut().fields.insert(var.name.clone(), value);
            }
        }

        let ctors: Vec<_> = decl.constructors().collect();
        if ctors.is_empty() {
            if args.is_empty() {
                return Ok(obj);
            }
            return fail(format!("{} has no constructor for {:?}", class, args));
        }
        let Some(ctor) = ctors.into_iter().find(|c| params_fit(&c.params, &args)) else {
            return fail(format!("{} has no constructor for {:?}", class, args));
        };
        for (param, arg) in ctor.params.iter().zip(args) {
            frame.declare(&param.name, arg);
        }
        self.exec_block(&mut frame, &ctor.body.stmts)?;
        Ok(obj)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn exec_block(&mut self, frame: &mut Frame, stmts: &[Stmt]) -> Eval<Flow> {
        frame.scopes.push(HashMap::new());
        let flow = self.exec_stmts(frame, stmts);
        frame.scopes.pop();
        flow
    }

    fn exec_stmts(&mut self, frame: &mut Frame, stmts: &[Stmt]) -> Eval<Flow> {
        for stmt in stmts {
            match self.exec(frame, stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, frame: &mut Frame, stmt: &Stmt) -> Eval<Flow> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(frame, expr)?;
            }
            Stmt::Local(local) => {
                for var in &local.variables {
                    let value = match &var.init {
                        Some(init) => self.eval(frame, init)?,
                        None => default_value(&local.ty),
                    };
                    frame.declare(&var.name, value);
                }
            }
            Stmt::Block(block) => return self.exec_block(frame, &block.stmts),
            Stmt::If(s) => {
                if self.truthy(frame, &s.cond)? {
                    return self.exec_block(frame, std::slice::from_ref(&*s.then_branch));
                }
                if let Some(else_branch) = &s.else_branch {
                    return self.exec_block(frame, std::slice::from_ref(&**else_branch));
                }
            }
            Stmt::While(s) => {
                while self.truthy(frame, &s.cond)? {
                    match self.exec_block(frame, std::slice::from_ref(&*s.body))? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
            }
            Stmt::For(s) => {
                frame.scopes.push(HashMap::new());
                let flow = self.exec_for(frame, s);
                frame.scopes.pop();
                return flow;
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(frame, expr)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Switch(s) => {
                let selector = self.eval(frame, &s.selector)?;
                let mut start = None;
                for (i, case) in s.cases.iter().enumerate() {
                    for label in &case.labels {
                        if self.eval(frame, label)? == selector {
                            start = Some(i);
                            break;
                        }
                    }
                    if start.is_some() {
                        break;
                    }
                }
                let start = start.or_else(|| s.cases.iter().position(|c| c.labels.is_empty()));
                let Some(start) = start else {
                    return Ok(Flow::Normal);
                };
                frame.scopes.push(HashMap::new());
                let mut flow = Ok(Flow::Normal);
                for case in &s.cases[start..] {
                    match self.exec_stmts(frame, &case.body) {
                        Ok(Flow::Normal) => continue,
                        Ok(Flow::Break) => break,
                        other => {
                            flow = other;
                            break;
                        }
                    }
                }
                frame.scopes.pop();
                return flow;
            }
            Stmt::Break => return Ok(Flow::Break),
            Stmt::Continue => return Ok(Flow::Continue),
            Stmt::Throw(expr) => {
                let thrown = self.eval(frame, expr)?;
                return fail(thrown.to_string());
            }
            Stmt::Empty => {}
        }
        Ok(Flow::Normal)
    }

    fn exec_for(&mut self, frame: &mut Frame, s: &ForStmt) -> Eval<Flow> {
        for init in &s.init {
            self.exec(frame, init)?;
        }
        loop {
            if let Some(cond) = &s.cond {
                if !self.truthy(frame, cond)? {
                    break;
                }
            }
            match self.exec_block(frame, std::slice::from_ref(&*s.body))? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
            for update in &s.update {
                self.eval(frame, update)?;
            }
        }
        Ok(Flow::Normal)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn truthy(&mut self, frame: &mut Frame, expr: &Expr) -> Eval<bool> {
        match self.eval(frame, expr)? {
            Value::Bool(b) => Ok(b),
            other => fail(format!("expected a boolean, got {}", other)),
        }
    }

    fn eval(&mut self, frame: &mut Frame, expr: &Expr) -> Eval<Value> {
        match expr {
            Expr::Literal(lit) => match lit {
                Literal::Int(n) | Literal::Long(n) => Ok(Value::Int(*n)),
                Literal::Bool(b) => Ok(Value::Bool(*b)),
                Literal::Char(c) => Ok(Value::Str(c.to_string())),
                Literal::Str(s) => Ok(Value::Str(s.clone())),
                Literal::Null => Ok(Value::Null),
                Literal::Float(text) | Literal::Double(text) => {
                    fail(format!("floating point literal {} not supported", text))
                }
            },
            Expr::Name(name) => frame
                .local(name)
                .or_else(|| frame.this_field(name))
                .ok_or_else(|| RuntimeError(format!("unknown name {}", name))),
            Expr::This => match &frame.this {
                Some(obj) => Ok(Value::Obj(obj.clone())),
                None => fail("`this` in a static context"),
            },
            Expr::FieldAccess(f) => {
                let receiver = self.eval(frame, &f.receiver)?;
                let Some(obj) = receiver.as_obj() else {
                    return fail(format!("NullPointerException: .{}", f.name));
                };
                let value = obj.borrow().fields.get(&f.name).cloned();
                value.ok_or_else(|| RuntimeError(format!("no field {}", f.name)))
            }
            Expr::MethodCall(call) => self.eval_call(frame, call),
            Expr::New(n) => {
                let args = self.eval_args(frame, &n.args)?;
                match self.resolve_class(Some(&frame.class), &n.ty.name) {
                    Some(class) => Ok(Value::Obj(self.construct(&class, args)?)),
                    // Library exceptions evaluate to their message.
                    None if n.ty.name.ends_with("Exception") => {
                        let message: Vec<String> = args.iter().map(Value::to_string).collect();
                        Ok(Value::Str(format!("{}: {}", n.ty.name, message.join(", "))))
                    }
                    None => fail(format!("unknown class {}", n.ty.name)),
                }
            }
            Expr::Assign(a) => {
                let value = self.eval(frame, &a.value)?;
                let value = match a.op.binary_op() {
                    Some(op) => {
                        let current = self.eval(frame, &a.target)?;
                        binary(op, current, value)?
                    }
                    None => value,
                };
                self.store(frame, &a.target, value.clone())?;
                Ok(value)
            }
            Expr::Binary(b) => match b.op {
                BinaryOp::And => Ok(Value::Bool(
                    self.truthy(frame, &b.lhs)? && self.truthy(frame, &b.rhs)?,
                )),
                BinaryOp::Or => Ok(Value::Bool(
                    self.truthy(frame, &b.lhs)? || self.truthy(frame, &b.rhs)?,
                )),
                op => {
                    let lhs = self.eval(frame, &b.lhs)?;
                    let rhs = self.eval(frame, &b.rhs)?;
                    binary(op, lhs, rhs)
                }
            },
            Expr::Unary(u) => match u.op {
                UnaryOp::Neg => match self.eval(frame, &u.operand)? {
                    Value::Int(n) => Ok(Value::Int(-n)),
                    other => fail(format!("cannot negate {}", other)),
                },
                UnaryOp::Not => Ok(Value::Bool(!self.truthy(frame, &u.operand)?)),
                UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                    let Value::Int(old) = self.eval(frame, &u.operand)? else {
                        return fail("increment of a non-integer");
                    };
                    let new = match u.op {
                        UnaryOp::PreInc | UnaryOp::PostInc => old + 1,
                        _ => old - 1,
                    };
                    self.store(frame, &u.operand, Value::Int(new))?;
                    match u.op {
                        UnaryOp::PreInc | UnaryOp::PreDec => Ok(Value::Int(new)),
                        _ => Ok(Value::Int(old)),
                    }
                }
            },
            Expr::Cast(c) => self.eval(frame, &c.expr),
        }
    }

    fn eval_args(&mut self, frame: &mut Frame, args: &[Expr]) -> Eval<Vec<Value>> {
        args.iter().map(|arg| self.eval(frame, arg)).collect()
    }

    fn eval_call(&mut self, frame: &mut Frame, call: &MethodCall) -> Eval<Value> {
        if is_println(call) {
            let line = match call.args.first() {
                Some(arg) => self.eval(frame, arg)?.to_string(),
                None => String::new(),
            };
            self.output.push(line);
            return Ok(Value::Null);
        }

        let args = self.eval_args(frame, &call.args)?;
        match call.receiver.as_deref() {
            None => {
                let class = frame.class.clone();
                self.invoke(&class, frame.this.clone(), &call.name, args)
            }
            // `Type.method(...)` on a name that is not a variable.
            Some(Expr::Name(name))
                if frame.local(name).is_none() && frame.this_field(name).is_none() =>
            {
                match self.resolve_class(Some(&frame.class), name) {
                    Some(class) => self.invoke(&class, None, &call.name, args),
                    None => fail(format!("unknown name {}", name)),
                }
            }
            Some(receiver) => match self.eval(frame, receiver)? {
                Value::Obj(obj) => {
                    let class = obj.borrow().class.clone();
                    self.invoke(&class, Some(obj), &call.name, args)
                }
                other => fail(format!("NullPointerException: {}.{}()", other, call.name)),
            },
        }
    }

    fn store(&mut self, frame: &mut Frame, target: &Expr, value: Value) -> Eval<()> {
        match target {
            Expr::Name(name) => {
                let Err(value) = frame.set_local(name, value) else {
                    return Ok(());
                };
                match &frame.this {
                    Some(obj) if obj.borrow().fields.contains_key(name) => {
                        obj.borrow_mut().fields.insert(name.clone(), value);
                        Ok(())
                    }
                    _ => fail(format!("unknown name {}", name)),
                }
            }
            Expr::FieldAccess(f) => match self.eval(frame, &f.receiver)? {
                Value::Obj(obj) => {
                    obj.borrow_mut().fields.insert(f.name.clone(), value);
                    Ok(())
                }
                other => fail(format!("NullPointerException: {}.{}", other, f.name)),
            },
            other => fail(format!("cannot assign to {:?}", other)),
        }
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Eval<Value> {
    use Value::{Bool, Int, Str};
    match (op, &lhs, &rhs) {
        (BinaryOp::Add, Int(a), Int(b)) => Ok(Int(a + b)),
        (BinaryOp::Add, Str(_), _) | (BinaryOp::Add, _, Str(_)) => {
            Ok(Str(format!("{}{}", lhs, rhs)))
        }
        (BinaryOp::Sub, Int(a), Int(b)) => Ok(Int(a - b)),
        (BinaryOp::Mul, Int(a), Int(b)) => Ok(Int(a * b)),
        (BinaryOp::Div | BinaryOp::Rem, Int(_), Int(0)) => fail("ArithmeticException: / by zero"),
        (BinaryOp::Div, Int(a), Int(b)) => Ok(Int(a / b)),
        (BinaryOp::Rem, Int(a), Int(b)) => Ok(Int(a % b)),
        (BinaryOp::Eq, _, _) => Ok(Bool(lhs == rhs)),
        (BinaryOp::Ne, _, _) => Ok(Bool(lhs != rhs)),
        (BinaryOp::Lt, Int(a), Int(b)) => Ok(Bool(a < b)),
        (BinaryOp::Le, Int(a), Int(b)) => Ok(Bool(a <= b)),
        (BinaryOp::Gt, Int(a), Int(b)) => Ok(Bool(a > b)),
        (BinaryOp::Ge, Int(a), Int(b)) => Ok(Bool(a >= b)),
        (BinaryOp::And, Bool(a), Bool(b)) => Ok(Bool(*a && *b)),
        (BinaryOp::Or, Bool(a), Bool(b)) => Ok(Bool(*a || *b)),
        _ => fail(format!("unsupported operands {} {} {}", lhs, op.symbol(), rhs)),
    }
}
