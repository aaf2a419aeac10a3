/*! Listener lists for engine events, e.g. an input source being pushed or closed.

```rust
use expand_engine::engine::utils::events::EventList;
use std::rc::Rc;
use std::cell::Cell;

let seen = Rc::new(Cell::new(0));
let mut events : EventList<usize> = EventList::default();
let s = seen.clone();
let id = events.register(move |depth| s.set(s.get() + *depth));
events.fire(&3);
events.unregister(id);
events.fire(&5);
assert_eq!(seen.get(),3);
```
*/

/// Identifies a registered listener, for [`EventList::unregister`].
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub struct ListenerId(usize);

/// An ordered list of listeners for events with payload `P`.
pub struct EventList<P> {
    listeners:Vec<(ListenerId,Box<dyn FnMut(&P)>)>,
    next:usize
}
impl<P> Default for EventList<P> {
    fn default() -> Self { EventList { listeners:Vec::new(), next:0 } }
}
impl<P> EventList<P> {
    /// Adds a listener; listeners are called in registration order.
    pub fn register<F:FnMut(&P) + 'static>(&mut self,f:F) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.listeners.push((id,Box::new(f)));
        id
    }
    /// Removes a listener; returns whether it was registered.
    pub fn unregister(&mut self,id:ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(i,_)| *i != id);
        len != self.listeners.len()
    }
    pub fn fire(&mut self,payload:&P) {
        for (_,l) in self.listeners.iter_mut() { l(payload) }
    }
    pub fn is_empty(&self) -> bool { self.listeners.is_empty() }
    pub fn len(&self) -> usize { self.listeners.len() }
}
impl<P> std::fmt::Debug for EventList<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,"EventList({} listeners)",self.listeners.len())
    }
}

/// The kind of input source an event refers to.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum SourceKind { File, String, Tokens }

/// Payload of the [`Mouth`](crate::engine::mouth::Mouth)'s source events.
#[derive(Clone,PartialEq,Eq,Debug)]
pub struct SourceEvent {
    pub kind:SourceKind,
    /// The file name for [`SourceKind::File`].
    pub name:Option<String>,
    /// The number of sources on the stack after the event.
    pub depth:usize
}

/// The four source events of the [`Mouth`](crate::engine::mouth::Mouth).
#[derive(Default,Debug)]
pub struct MouthEvents {
    /// A source has been pushed.
    pub push:EventList<SourceEvent>,
    /// An exhausted source has been popped.
    pub pop:EventList<SourceEvent>,
    /// A file or string source has reached its end.
    pub eof:EventList<SourceEvent>,
    /// A file has been closed.
    pub close:EventList<SourceEvent>
}
