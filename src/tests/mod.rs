mod test_network;
mod test_stream;
