use log::debug;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared single-instance services, keyed by type name.
///
/// Replaces "the constructor hands back an existing object" singletons with an
/// explicit owner: whoever holds the registry decides the lifetime, and every
/// consumer gets an `Rc` handle to the same instance.
#[derive(Default)]
pub struct Registry {
    instances: RefCell<HashMap<&'static str, Rc<dyn Any>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared instance, constructing it on first use.
    pub fn instance<T: Default + 'static>(&self) -> Rc<T> {
        if let Some(existing) = self.get::<T>() {
            return existing;
        }
        let created = Rc::new(T::default());
        self.insert(Rc::clone(&created));
        created
    }

    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        self.instances
            .borrow()
            .get(type_name::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// Stores an already built instance, replacing any previous one.
    pub fn insert<T: 'static>(&self, instance: Rc<T>) {
        debug!("Registry: registered {}", type_name::<T>());
        self.instances
            .borrow_mut()
            .insert(type_name::<T>(), instance as Rc<dyn Any>);
    }

    /// Forgets the instance. Outstanding handles stay valid until dropped.
    pub fn destroy<T: 'static>(&self) -> bool {
        self.instances.borrow_mut().remove(type_name::<T>()).is_some()
    }

    pub fn clear(&self) {
        self.instances.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        hits: Cell<u32>,
    }

    #[test]
    fn instance_is_constructed_once_and_shared() {
        let registry = Registry::new();
        let a = registry.instance::<Counter>();
        let b = registry.instance::<Counter>();
        a.hits.set(3);
        assert_eq!(b.hits.get(), 3);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn destroy_allows_a_fresh_instance() {
        let registry = Registry::new();
        let first = registry.instance::<Counter>();
        first.hits.set(7);

        assert!(registry.destroy::<Counter>());
        assert!(!registry.destroy::<Counter>());

        let second = registry.instance::<Counter>();
        assert_eq!(second.hits.get(), 0);
        // old handle is still usable
        assert_eq!(first.hits.get(), 7);
    }

    #[test]
    fn insert_and_get_prebuilt_instance() {
        let registry = Registry::new();
        assert!(registry.get::<String>().is_none());
        registry.insert(Rc::new(String::from("endpoint")));
        assert_eq!(registry.get::<String>().as_deref().map(String::as_str), Some("endpoint"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
