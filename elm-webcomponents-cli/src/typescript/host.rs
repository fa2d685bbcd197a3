//! Type resolution over parsed TypeScript files.
//!
//! [`TsProgram`] collects the declarations of every input file into one
//! global scope and answers [`TypeHost`] queries about them. References to
//! named types are resolved lazily: a reference becomes a pending node that
//! is instantiated on first inspection, so recursive types cost nothing
//! until the classifier walks into them. Instantiations are cached by
//! declaration name and argument handles.

use std::cell::RefCell;
use std::collections::hash_map::Entry as Slot;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use elm_webcomponents::host::{
    Annotation, AnnotationArg, Declaration, DeclaredMember, TypeHost, TypeKind, TypeMember,
};
use tracing::{debug, warn};

use super::ast::{
    ClassDecl, ClassProperty, Decorator, Expr, Interface, Item, Keyword, Module,
    PropertySignature, TypeExpr, TypeParam,
};

/// Handle to a type inside a [`TsProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TsType(usize);

/// Type parameter bindings.
type Env = Rc<HashMap<String, TsType>>;

/// Longest chain of aliases followed before giving up.
const MAX_ALIAS_CHAIN: usize = 64;

/// Instantiations of one generic declaration before giving up.
const MAX_INSTANTIATIONS: usize = 256;

#[derive(Debug, Clone)]
enum Node {
    /// Reference to a named declaration, not instantiated yet.
    Pending { name: String, args: Vec<TsType> },
    /// Same type as another node.
    Alias(TsType),
    Kind(TypeKind<TsType>),
    Array(TsType),
    Object(Vec<TypeMember<TsType>>),
}

impl Node {
    fn other(description: impl Into<String>) -> Self {
        Node::Kind(TypeKind::Other(description.into()))
    }
}

#[derive(Debug)]
struct Entry {
    node: Node,
    display: String,
}

/// A component class found in the input, with the file it came from.
#[derive(Debug, Clone)]
pub struct SourceDeclaration {
    pub file: PathBuf,
    pub declaration: Declaration<TsType>,
}

/// All parsed input files, resolved as one program.
#[derive(Debug, Default)]
pub struct TsProgram {
    declarations: HashMap<String, Item>,
    classes: Vec<(PathBuf, ClassDecl)>,
    nodes: RefCell<Vec<Entry>>,
    instances: RefCell<HashMap<(String, Vec<TsType>), TsType>>,
    instance_counts: RefCell<HashMap<String, usize>>,
    keywords: RefCell<HashMap<Keyword, TsType>>,
    forcing: RefCell<HashSet<TsType>>,
}

impl TsProgram {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the declarations of a parsed file.
    ///
    /// Names share one scope across files. Interfaces with the same name are
    /// merged; any other redeclaration keeps the first one.
    pub fn add_module(&mut self, file: &Path, module: Module) {
        for item in module.items {
            if let Item::Class(class) = &item {
                self.classes.push((file.to_path_buf(), class.clone()));
                if class.name.is_empty() {
                    continue;
                }
            }

            match self.declarations.entry(item.name().to_string()) {
                Slot::Vacant(slot) => {
                    slot.insert(item);
                }
                Slot::Occupied(mut slot) => match (slot.get_mut(), item) {
                    (Item::Interface(existing), Item::Interface(more)) => {
                        merge_interface(existing, more);
                    }
                    (_, item) => {
                        warn!(name = %item.name(), file = %file.display(), "duplicate declaration ignored");
                    }
                },
            }
        }
    }

    /// Number of named declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Handle for a declared type name, without type arguments.
    pub fn named_type(&self, name: &str) -> Option<TsType> {
        if !self.declarations.contains_key(name) {
            return None;
        }
        Some(self.resolve_reference(name, &[], &Env::default()))
    }

    /// Every class in input order, as generator declarations.
    pub fn declarations(&self) -> Vec<SourceDeclaration> {
        self.classes
            .iter()
            .filter(|(_, class)| !class.name.is_empty())
            .map(|(file, class)| SourceDeclaration {
                file: file.clone(),
                declaration: self.class_declaration(class),
            })
            .collect()
    }

    fn class_declaration(&self, class: &ClassDecl) -> Declaration<TsType> {
        let env = self.bind_unbound(&class.params);
        let base_type_argument = match &class.extends {
            Some(TypeExpr::Reference { args, .. }) => {
                args.first().map(|arg| self.resolve(arg, &env))
            }
            _ => None,
        };

        let members = class
            .members
            .iter()
            .map(|member| DeclaredMember {
                name: member.name.clone(),
                doc: member.doc.clone(),
                annotations: member.decorators.iter().map(annotation).collect(),
                ty: self.property_type(member, &env),
            })
            .collect();

        debug!(class = %class.name, "read class declaration");
        Declaration {
            name: class.name.clone(),
            doc: class.doc.clone(),
            annotations: class.decorators.iter().map(annotation).collect(),
            base_type_argument,
            members,
        }
    }

    /// Declared type of a property, or the widened type of its literal
    /// initializer. Anything else is implicitly `any`.
    fn property_type(&self, member: &ClassProperty, env: &Env) -> TsType {
        if let Some(ty) = &member.ty {
            return self.resolve(ty, env);
        }
        let keyword = match &member.initializer {
            Some(Expr::String(_)) => Keyword::String,
            Some(Expr::Number(_)) => Keyword::Number,
            Some(Expr::Bool(_)) => Keyword::Boolean,
            _ => Keyword::Any,
        };
        self.keyword(keyword)
    }

    // =========================================================================
    // Node arena
    // =========================================================================

    fn push(&self, node: Node, display: impl Into<String>) -> TsType {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Entry {
            node,
            display: display.into(),
        });
        TsType(nodes.len() - 1)
    }

    fn node(&self, ty: TsType) -> Node {
        self.nodes.borrow()[ty.0].node.clone()
    }

    fn keyword(&self, keyword: Keyword) -> TsType {
        if let Some(&ty) = self.keywords.borrow().get(&keyword) {
            return ty;
        }
        let kind = match keyword {
            Keyword::String => TypeKind::String,
            Keyword::Number => TypeKind::Number,
            Keyword::Boolean => TypeKind::Boolean,
            Keyword::BigInt => TypeKind::BigInt,
            Keyword::Symbol => TypeKind::Symbol,
            Keyword::Any => TypeKind::Any,
            Keyword::Unknown => TypeKind::Unknown,
            Keyword::Never => TypeKind::Never,
            Keyword::Void => TypeKind::Void,
            Keyword::Undefined => TypeKind::Undefined,
            Keyword::Null => TypeKind::Null,
            Keyword::Object => TypeKind::Other("non-primitive object type".to_string()),
        };
        let ty = self.push(Node::Kind(kind), keyword.as_str());
        self.keywords.borrow_mut().insert(keyword, ty);
        ty
    }

    /// Follow aliases and instantiate pending references.
    fn canonical(&self, mut ty: TsType) -> TsType {
        for _ in 0..MAX_ALIAS_CHAIN {
            match self.node(ty) {
                Node::Alias(target) => ty = target,
                Node::Pending { name, args } => self.force(ty, &name, &args),
                _ => return ty,
            }
        }
        let display = self.display(&ty);
        self.nodes.borrow_mut()[ty.0].node = Node::other(format!("circular type alias {display}"));
        ty
    }

    fn force(&self, ty: TsType, name: &str, args: &[TsType]) {
        let node = if self.forcing.borrow_mut().insert(ty) {
            let node = self.instantiate(name, args);
            self.forcing.borrow_mut().remove(&ty);
            node
        } else {
            Node::other(format!("circular type reference {name}"))
        };
        self.nodes.borrow_mut()[ty.0].node = node;
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn resolve(&self, expr: &TypeExpr, env: &Env) -> TsType {
        let node = match expr {
            TypeExpr::Keyword(keyword) => return self.keyword(*keyword),
            TypeExpr::Reference { name, args } => return self.resolve_reference(name, args, env),
            TypeExpr::StringLiteral(s) => Node::Kind(TypeKind::StringLiteral(s.clone())),
            TypeExpr::NumberLiteral(n) => Node::Kind(TypeKind::NumberLiteral(*n)),
            TypeExpr::BooleanLiteral(b) => Node::Kind(TypeKind::BooleanLiteral(*b)),
            TypeExpr::Array(element) => Node::Array(self.resolve(element, env)),
            TypeExpr::Object(members) => Node::Object(self.resolve_members(members, env)),
            TypeExpr::Union(members) => Node::Kind(TypeKind::Union(
                members.iter().map(|m| self.resolve(m, env)).collect(),
            )),
            TypeExpr::Tuple(_) => Node::other("tuple type"),
            TypeExpr::Intersection(_) => Node::other("intersection type"),
            TypeExpr::Function => Node::other("function type"),
            TypeExpr::Other(description) => Node::other(description.clone()),
        };
        self.push(node, expr.to_string())
    }

    fn resolve_members(&self, members: &[PropertySignature], env: &Env) -> Vec<TypeMember<TsType>> {
        members
            .iter()
            .map(|m| TypeMember::new(m.name.clone(), m.doc.clone(), self.resolve(&m.ty, env)))
            .collect()
    }

    fn resolve_reference(&self, name: &str, args: &[TypeExpr], env: &Env) -> TsType {
        if args.is_empty() {
            if let Some(&bound) = env.get(name) {
                return bound;
            }
        }

        let display = TypeExpr::Reference {
            name: name.to_string(),
            args: args.to_vec(),
        }
        .to_string();

        if matches!(name, "Array" | "ReadonlyArray") && args.len() == 1 {
            let element = self.resolve(&args[0], env);
            return self.push(Node::Array(element), display);
        }

        let Some(declared) = self.lookup(name) else {
            return self.push(Node::other(format!("unresolved type {name}")), display);
        };

        let args: Vec<TsType> = args.iter().map(|a| self.resolve(a, env)).collect();
        let key = (declared.to_string(), args);
        if let Some(&ty) = self.instances.borrow().get(&key) {
            return ty;
        }

        let count = {
            let mut counts = self.instance_counts.borrow_mut();
            let count = counts.entry(key.0.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if count > MAX_INSTANTIATIONS {
            return self.push(
                Node::other(format!("type instantiation of {name} is too deep")),
                display,
            );
        }

        let ty = self.push(
            Node::Pending {
                name: key.0.clone(),
                args: key.1.clone(),
            },
            display,
        );
        self.instances.borrow_mut().insert(key, ty);
        ty
    }

    /// Declared name for a possibly qualified reference.
    fn lookup<'n>(&self, name: &'n str) -> Option<&'n str> {
        if self.declarations.contains_key(name) {
            return Some(name);
        }
        let last = name.rsplit('.').next()?;
        self.declarations.contains_key(last).then_some(last)
    }

    fn instantiate(&self, name: &str, args: &[TsType]) -> Node {
        let Some(item) = self.declarations.get(name) else {
            return Node::other(format!("unresolved type {name}"));
        };

        match item {
            Item::TypeAlias(alias) => {
                let env = self.bind(&alias.params, args);
                Node::Alias(self.resolve(&alias.ty, &env))
            }
            Item::Interface(interface) => self.instantiate_interface(interface, args),
            Item::Enum(decl) => Node::Kind(TypeKind::Enum(decl.name.clone())),
            Item::Class(class) => {
                let env = self.bind(&class.params, args);
                let members = class
                    .members
                    .iter()
                    .filter(|m| !m.name.starts_with('#'))
                    .map(|m| TypeMember::new(m.name.clone(), m.doc.clone(), self.property_type(m, &env)))
                    .collect();
                Node::Object(members)
            }
        }
    }

    /// Own members first, then inherited members that are not redeclared.
    fn instantiate_interface(&self, interface: &Interface, args: &[TsType]) -> Node {
        if let Some(reason) = &interface.opaque {
            return Node::other(reason.clone());
        }

        let env = self.bind(&interface.params, args);
        let mut members = self.resolve_members(&interface.members, &env);

        for base in &interface.extends {
            let base = self.resolve(base, &env);
            let base = self.canonical(base);
            match self.node(base) {
                Node::Object(inherited) => {
                    for member in inherited {
                        if !members.iter().any(|m| m.name == member.name) {
                            members.push(member);
                        }
                    }
                }
                _ => {
                    return Node::other(format!(
                        "interface {} extends {}",
                        interface.name,
                        self.display(&base)
                    ))
                }
            }
        }
        Node::Object(members)
    }

    /// Bind type parameters to arguments, falling back to defaults. Missing
    /// arguments without a default stay unbound type parameters.
    fn bind(&self, params: &[TypeParam], args: &[TsType]) -> Env {
        let mut env = HashMap::new();
        for (i, param) in params.iter().enumerate() {
            let ty = match (args.get(i), &param.default) {
                (Some(&arg), _) => arg,
                (None, Some(default)) => self.resolve(default, &Rc::new(env.clone())),
                (None, None) => self.type_parameter(&param.name),
            };
            env.insert(param.name.clone(), ty);
        }
        Rc::new(env)
    }

    fn bind_unbound(&self, params: &[TypeParam]) -> Env {
        Rc::new(
            params
                .iter()
                .map(|p| (p.name.clone(), self.type_parameter(&p.name)))
                .collect(),
        )
    }

    fn type_parameter(&self, name: &str) -> TsType {
        self.push(Node::Kind(TypeKind::TypeParameter(name.to_string())), name)
    }

    fn flatten_union(&self, members: Vec<TsType>, seen: &mut HashSet<TsType>, out: &mut Vec<TsType>) {
        for member in members {
            let canonical = self.canonical(member);
            match self.node(canonical) {
                Node::Kind(TypeKind::Union(inner)) => {
                    if seen.insert(canonical) {
                        self.flatten_union(inner, seen, out);
                    }
                }
                _ => out.push(member),
            }
        }
    }
}

impl TypeHost for TsProgram {
    type Type = TsType;

    fn kind(&self, ty: &TsType) -> TypeKind<TsType> {
        let canonical = self.canonical(*ty);
        match self.node(canonical) {
            Node::Kind(TypeKind::Union(members)) => {
                let mut seen = HashSet::from([canonical]);
                let mut flat = Vec::new();
                self.flatten_union(members, &mut seen, &mut flat);
                TypeKind::Union(flat)
            }
            Node::Kind(kind) => kind,
            Node::Array(_) | Node::Object(_) => TypeKind::Object,
            Node::Pending { name, .. } => TypeKind::Other(format!("unresolved type {name}")),
            Node::Alias(_) => TypeKind::Other("circular type alias".to_string()),
        }
    }

    fn array_element(&self, ty: &TsType) -> Option<TsType> {
        match self.node(self.canonical(*ty)) {
            Node::Array(element) => Some(element),
            _ => None,
        }
    }

    fn members(&self, ty: &TsType) -> Vec<TypeMember<TsType>> {
        match self.node(self.canonical(*ty)) {
            Node::Object(members) => members,
            _ => Vec::new(),
        }
    }

    fn display(&self, ty: &TsType) -> String {
        self.nodes.borrow()[ty.0].display.clone()
    }
}

fn merge_interface(existing: &mut Interface, more: Interface) {
    existing.extends.extend(more.extends);
    for member in more.members {
        if !existing.members.iter().any(|m| m.name == member.name) {
            existing.members.push(member);
        }
    }
    if existing.opaque.is_none() {
        existing.opaque = more.opaque;
    }
}

fn annotation(decorator: &Decorator) -> Annotation {
    Annotation::new(
        decorator.name.clone(),
        decorator.arguments.iter().map(annotation_arg).collect(),
    )
}

fn annotation_arg(expr: &Expr) -> AnnotationArg {
    match expr {
        Expr::String(s) => AnnotationArg::String(s.clone()),
        Expr::Number(n) => AnnotationArg::Number(*n),
        Expr::Bool(b) => AnnotationArg::Bool(*b),
        Expr::Object(entries) => AnnotationArg::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), annotation_arg(value)))
                .collect(),
        ),
        Expr::Array(elements) => AnnotationArg::Array(elements.iter().map(annotation_arg).collect()),
        Expr::Null | Expr::Undefined | Expr::Other => AnnotationArg::Other,
    }
}
