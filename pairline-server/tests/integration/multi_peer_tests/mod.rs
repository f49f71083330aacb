mod test_explicit_leave;
mod test_peer_disconnect_notifies_survivor;
