crate::reexport!(column);
crate::reexport!(table);
crate::reexport!(schema);
crate::reexport!(introspect);
